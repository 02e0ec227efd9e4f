use bson::{doc, DateTime};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::db::mongo::{is_duplicate_key_error, DB_NAME};
use crate::errors::ApiError;
use crate::models::wallet::{WalletAccount, STARTING_BALANCE_CENTS};

pub struct WalletService;

impl WalletService {
    fn wallets(client: &Client) -> Collection<WalletAccount> {
        client.database(DB_NAME).collection("Wallets")
    }

    /// Wallet rows are created on first touch with the default starting
    /// balance. The `$setOnInsert` upsert is a no-op for existing accounts,
    /// so it is safe to run before every ledger operation.
    async fn ensure_account(client: &Client, user_id: &str) -> Result<(), ApiError> {
        let result = Self::wallets(client)
            .update_one(
                doc! { "user_id": user_id },
                doc! {
                    "$setOnInsert": {
                        "user_id": user_id,
                        "balance_cents": STARTING_BALANCE_CENTS,
                        "updated_at": DateTime::now(),
                    }
                },
            )
            .upsert(true)
            .await;

        match result {
            Ok(_) => Ok(()),
            // two first-touch upserts can race on the unique user_id index;
            // the loser's duplicate-key failure means the row already exists
            Err(err) if is_duplicate_key_error(&err) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn balance(client: &Client, user_id: &str) -> Result<i64, ApiError> {
        Self::ensure_account(client, user_id).await?;

        let account = Self::wallets(client)
            .find_one(doc! { "user_id": user_id })
            .await?;

        Ok(account
            .map(|a| a.balance_cents)
            .unwrap_or(STARTING_BALANCE_CENTS))
    }

    /// Atomic conditional debit. The sufficiency check and the decrement are
    /// one document update: the filter only matches while
    /// `balance_cents >= amount`, so two concurrent debits can never both
    /// pass against a stale balance. Returns the new balance.
    pub async fn debit(client: &Client, user_id: &str, amount_cents: i64) -> Result<i64, ApiError> {
        if amount_cents < 0 {
            return Err(ApiError::validation("amount"));
        }
        Self::ensure_account(client, user_id).await?;

        let updated = Self::wallets(client)
            .find_one_and_update(
                doc! {
                    "user_id": user_id,
                    "balance_cents": { "$gte": amount_cents },
                },
                doc! {
                    "$inc": { "balance_cents": -amount_cents },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(account) => Ok(account.balance_cents),
            None => Err(ApiError::InsufficientFunds),
        }
    }

    /// Atomic credit, used for refunds. Returns the new balance.
    pub async fn credit(client: &Client, user_id: &str, amount_cents: i64) -> Result<i64, ApiError> {
        if amount_cents < 0 {
            return Err(ApiError::validation("amount"));
        }
        Self::ensure_account(client, user_id).await?;

        let updated = Self::wallets(client)
            .find_one_and_update(
                doc! { "user_id": user_id },
                doc! {
                    "$inc": { "balance_cents": amount_cents },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        // ensure_account just upserted the row, so a miss here means the
        // datastore is misbehaving rather than a business-rule failure
        match updated {
            Some(account) => Ok(account.balance_cents),
            None => Err(ApiError::Database(mongodb::error::Error::custom(
                "wallet row missing after upsert".to_string(),
            ))),
        }
    }
}
