use actix_web::{web, HttpResponse};
use mongodb::Client;
use std::sync::Arc;

use crate::errors::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::services::pricing_service::cents_to_amount;
use crate::services::wallet_service::WalletService;

/// GET /api/wallet — the caller's current balance.
pub async fn get_balance(
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let balance = WalletService::balance(&data, &user.user_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "balance": cents_to_amount(balance),
    })))
}
