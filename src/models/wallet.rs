use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Starting balance seeded into a wallet the first time a user touches the
/// ledger (50,000.00 in major units, matching the registration seed).
pub const STARTING_BALANCE_CENTS: i64 = 5_000_000;

/// One row per user. Balance is integer cents; mutated only through the
/// ledger's debit/credit operations, each of which stamps `updated_at`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub balance_cents: i64,
    pub updated_at: DateTime,
}
