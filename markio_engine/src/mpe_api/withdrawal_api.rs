//! Vendor withdrawals.
//!
//! A withdrawal request is checked twice: against our own ledger ([`WithdrawalApi::verify_ledger`]) and against the
//! balance the payment processor holds for the vendor ([`WithdrawalApi::verify_external`]). Only if both approve is
//! a payout created. The payout returned by the processor is then compared with the request, and cancelled if it does
//! not match.
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use log::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    db_types::{Cents, NewPayout, Payout, PayoutStatusType, Vendor},
    events::{EventProducers, PayoutCreatedEvent, PayoutMismatchEvent},
    helpers::amount_to_cents,
    mpe_api::errors::WithdrawalError,
    traits::{GatewayPayout, PaymentProcessor, PayoutManagement},
};

pub const DEFAULT_FEE_PERCENTAGE: u32 = 10;

/// The outcome of a single withdrawal check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Verification {
    Approved,
    Unapproved,
    Error(String),
}

impl Verification {
    pub fn is_approved(&self) -> bool {
        matches!(self, Verification::Approved)
    }
}

/// One async mutex per vendor. Withdrawals for a vendor hold it from verification until the payout is stored.
///
/// A lock that nobody holds or waits for is only referenced by the map, and is pruned on the next `acquire`.
#[derive(Clone, Default)]
pub struct VendorLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl VendorLocks {
    pub async fn acquire(&self, vendor_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(vendor_id).or_default())
        };
        lock.lock_owned().await
    }

    /// The number of vendors with a lock entry.
    pub async fn active_vendors(&self) -> usize {
        self.locks.lock().await.len()
    }
}

pub struct WithdrawalApi<B, G> {
    db: B,
    gateway: G,
    fee_percentage: u32,
    locks: VendorLocks,
    producers: EventProducers,
}

impl<B: Debug, G> Debug for WithdrawalApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WithdrawalApi ({:?}, fee {}%)", self.db, self.fee_percentage)
    }
}

impl<B, G> WithdrawalApi<B, G> {
    pub fn new(db: B, gateway: G, fee_percentage: u32, producers: EventProducers) -> Self {
        Self { db, gateway, fee_percentage, locks: VendorLocks::default(), producers }
    }

    pub fn fee_percentage(&self) -> u32 {
        self.fee_percentage
    }
}

impl<B, G> WithdrawalApi<B, G>
where
    B: PayoutManagement,
    G: PaymentProcessor,
{
    /// Checks the requested amount against the vendor's completed earnings in the ledger.
    pub async fn verify_ledger(&self, vendor: &Vendor, amount: Decimal) -> Verification {
        match self.db.completed_earnings(vendor.id).await {
            Ok(Some(total)) if total.is_positive() && amount <= total.to_decimal() => Verification::Approved,
            Ok(_) => {
                debug!("🔄️💸️ Vendor #{} has insufficient completed earnings for {amount}", vendor.id);
                Verification::Unapproved
            },
            Err(e) => {
                error!("🔄️💸️ Could not total the ledger for vendor #{}. {e}", vendor.id);
                Verification::Error(e.to_string())
            },
        }
    }

    /// Checks the requested amount against the available balance held by the payment processor.
    pub async fn verify_external(&self, vendor: &Vendor, amount: Decimal) -> Verification {
        let requested = match Cents::from_decimal(amount) {
            Ok(c) => c,
            Err(e) => return Verification::Error(e.to_string()),
        };
        let Some(account) = vendor.stripe_id.as_deref() else {
            warn!("🔄️💸️ Vendor #{} has no payment processor account", vendor.id);
            return Verification::Error("Vendor has no payment processor account".into());
        };
        match self.gateway.retrieve_balance(account).await {
            Ok(Some(balance)) if requested <= balance.amount => Verification::Approved,
            Ok(Some(balance)) => {
                debug!("🔄️💸️ External balance for {account} is {}. {requested} was requested", balance.amount);
                Verification::Unapproved
            },
            Ok(None) => {
                warn!("🔄️💸️ The payment processor reported no available balance for {account}");
                Verification::Error("No balance available".into())
            },
            Err(e) => {
                error!("🔄️💸️ Could not retrieve the balance for {account}. {e}");
                Verification::Error(e.to_string())
            },
        }
    }

    /// Withdraws `amount` (in major units) from the vendor profile owned by `user_id` to the vendor's bank account.
    ///
    /// On success the stored payout is returned. A payout that the processor returns with a different amount, or
    /// marks as failed, is cancelled and reported as [`WithdrawalError::Mismatch`]; it is never reported as a success.
    pub async fn withdraw(&self, user_id: i64, amount: Decimal) -> Result<Payout, WithdrawalError> {
        let requested = amount_to_cents(amount).map_err(WithdrawalError::InvalidAmount)?;
        let fee = requested
            .percentage(self.fee_percentage)
            .ok_or_else(|| WithdrawalError::InvalidAmount(format!("The fee on {amount} is out of range")))?;
        let vendor = self.db.fetch_vendor_for_user(user_id).await?.ok_or(WithdrawalError::VendorNotFound(user_id))?;
        let _guard = self.locks.acquire(vendor.id).await;
        trace!("🔄️💸️ Withdrawal lock acquired for vendor #{}", vendor.id);

        let (ledger, external) = tokio::join!(self.verify_ledger(&vendor, amount), self.verify_external(&vendor, amount));
        debug!("🔄️💸️ Withdrawal of {amount} for vendor #{}. Ledger: {ledger:?}, external: {external:?}", vendor.id);
        match (&ledger, &external) {
            (Verification::Approved, Verification::Approved) => {},
            (Verification::Unapproved, _) | (_, Verification::Unapproved) => return Err(WithdrawalError::Unapproved),
            (Verification::Error(e), _) | (_, Verification::Error(e)) => {
                return Err(WithdrawalError::VerificationError(e.clone()))
            },
        }
        // Verification fails without a processor account, so this is always set here
        let account = vendor.stripe_id.clone().ok_or(WithdrawalError::VerificationError("No account".into()))?;

        let bank_accounts = self.gateway.retrieve_bank_accounts(&account).await?;
        let Some(bank_account) = bank_accounts.first() else {
            info!("🔄️💸️ Vendor #{} has no bank account. No payout will be made", vendor.id);
            return Err(WithdrawalError::NoBankAccount);
        };
        let currency = bank_account.currency.clone();

        let gateway_payout = self.gateway.create_payout(requested, &currency, &account).await?;
        info!("🔄️💸️ Payout {} created for vendor #{}. Status: {:?}", gateway_payout.id, vendor.id, gateway_payout.status);
        let status = if gateway_payout.is_failed() { PayoutStatusType::Failed } else { PayoutStatusType::Omw };
        let new_payout = NewPayout {
            vendor_id: vendor.id,
            amount: gateway_payout.amount,
            currency,
            fee,
            stripe_id: gateway_payout.id.clone(),
            status,
            data: gateway_payout.raw.clone(),
        };
        let payout = match self.db.insert_payout(new_payout).await {
            Ok((payout, _tx)) => payout,
            Err(e) => {
                error!(
                    "🔄️💸️ Payout {} was created but could not be stored. {e}. Attempting to cancel it.",
                    gateway_payout.id
                );
                self.try_cancel(&gateway_payout, &account).await;
                return Err(e.into());
            },
        };

        if gateway_payout.amount != requested || gateway_payout.is_failed() {
            return Err(self.reconcile_mismatch(vendor.id, payout, &gateway_payout, requested, &account).await);
        }
        self.producers.publish_payout_created(PayoutCreatedEvent::new(vendor.id, payout.clone())).await;
        Ok(payout)
    }

    async fn reconcile_mismatch(
        &self,
        vendor_id: i64,
        payout: Payout,
        gateway_payout: &GatewayPayout,
        requested: Cents,
        account: &str,
    ) -> WithdrawalError {
        warn!(
            "🔄️💸️ Payout {} does not match the request. Requested {requested}, got {} ({:?})",
            gateway_payout.id, gateway_payout.amount, gateway_payout.status
        );
        let cancelled = self.try_cancel(gateway_payout, account).await;
        let payout = if cancelled {
            match self.db.update_payout_status(payout.id, PayoutStatusType::Cancelled).await {
                Ok(p) => p,
                Err(e) => {
                    error!("🔄️💸️ Payout #{} was cancelled, but its status could not be updated. {e}", payout.id);
                    payout
                },
            }
        } else {
            payout
        };
        let event = PayoutMismatchEvent {
            vendor_id,
            payout: payout.clone(),
            requested,
            returned: gateway_payout.amount,
            cancelled,
        };
        self.producers.publish_payout_mismatch(event).await;
        WithdrawalError::Mismatch { payout: Box::new(payout), requested, returned: gateway_payout.amount, cancelled }
    }

    async fn try_cancel(&self, gateway_payout: &GatewayPayout, account: &str) -> bool {
        match self.gateway.cancel_payout(&gateway_payout.id, account).await {
            Ok(()) => {
                info!("🔄️💸️ Payout {} cancelled", gateway_payout.id);
                true
            },
            Err(e) => {
                error!("🔄️💸️ Could not cancel payout {}. It needs manual attention. {e}", gateway_payout.id);
                false
            },
        }
    }
}
