use mockall::mock;
use markio_engine::{
    db_types::{
        Basket,
        Cents,
        Line,
        NewPayout,
        Payout,
        PayoutStatusType,
        Product,
        Transaction,
        User,
        Vendor,
    },
    traits::{
        BasketError,
        BasketManagement,
        CheckoutProcessor,
        CheckoutRequest,
        CheckoutSessionRef,
        ExternalBalance,
        GatewayBankAccount,
        GatewayError,
        GatewayPayout,
        LedgerError,
        LedgerManagement,
        PaymentProcessor,
        PayoutManagement,
    },
};

mock! {
    pub Ledger {}
    impl LedgerManagement for Ledger {
        async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, LedgerError>;
        async fn fetch_vendor_for_user(&self, user_id: i64) -> Result<Option<Vendor>, LedgerError>;
        async fn completed_earnings(&self, vendor_id: i64) -> Result<Option<Cents>, LedgerError>;
        async fn pending_earnings(&self, vendor_id: i64) -> Result<Cents, LedgerError>;
        async fn fetch_payouts_for_vendor(&self, vendor_id: i64, limit: i64) -> Result<Vec<Payout>, LedgerError>;
        async fn fetch_last_payout(&self, vendor_id: i64) -> Result<Option<Payout>, LedgerError>;
    }
}

mock! {
    pub PayoutDb {}
    impl LedgerManagement for PayoutDb {
        async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, LedgerError>;
        async fn fetch_vendor_for_user(&self, user_id: i64) -> Result<Option<Vendor>, LedgerError>;
        async fn completed_earnings(&self, vendor_id: i64) -> Result<Option<Cents>, LedgerError>;
        async fn pending_earnings(&self, vendor_id: i64) -> Result<Cents, LedgerError>;
        async fn fetch_payouts_for_vendor(&self, vendor_id: i64, limit: i64) -> Result<Vec<Payout>, LedgerError>;
        async fn fetch_last_payout(&self, vendor_id: i64) -> Result<Option<Payout>, LedgerError>;
    }
    impl PayoutManagement for PayoutDb {
        async fn insert_payout(&self, payout: NewPayout) -> Result<(Payout, Transaction), LedgerError>;
        async fn update_payout_status(&self, payout_id: i64, status: PayoutStatusType) -> Result<Payout, LedgerError>;
    }
}

mock! {
    pub MarketDb {}
    impl LedgerManagement for MarketDb {
        async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, LedgerError>;
        async fn fetch_vendor_for_user(&self, user_id: i64) -> Result<Option<Vendor>, LedgerError>;
        async fn completed_earnings(&self, vendor_id: i64) -> Result<Option<Cents>, LedgerError>;
        async fn pending_earnings(&self, vendor_id: i64) -> Result<Cents, LedgerError>;
        async fn fetch_payouts_for_vendor(&self, vendor_id: i64, limit: i64) -> Result<Vec<Payout>, LedgerError>;
        async fn fetch_last_payout(&self, vendor_id: i64) -> Result<Option<Payout>, LedgerError>;
    }
    impl BasketManagement for MarketDb {
        async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, BasketError>;
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, BasketError>;
        async fn fetch_active_basket(&self, owner_id: i64) -> Result<Option<Basket>, BasketError>;
        async fn fetch_lines(&self, basket_id: i64) -> Result<Vec<Line>, BasketError>;
        async fn create_basket(&self, owner_id: i64, vendor_id: Option<i64>) -> Result<Basket, BasketError>;
        async fn assign_vendor(&self, basket_id: i64, vendor_id: i64) -> Result<Basket, BasketError>;
        async fn switch_basket_vendor(&self, basket_id: i64, vendor_id: i64) -> Result<Basket, BasketError>;
        async fn add_line(&self, basket_id: i64, product_id: i64, quantity: i64) -> Result<Line, BasketError>;
        async fn delete_line(&self, line_id: i64) -> Result<(), BasketError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentProcessor for Gateway {
        async fn retrieve_balance(&self, account: &str) -> Result<Option<ExternalBalance>, GatewayError>;
        async fn retrieve_bank_accounts(&self, account: &str) -> Result<Vec<GatewayBankAccount>, GatewayError>;
        async fn create_payout(&self, amount: Cents, currency: &str, account: &str) -> Result<GatewayPayout, GatewayError>;
        async fn cancel_payout(&self, payout_id: &str, account: &str) -> Result<(), GatewayError>;
    }
    impl CheckoutProcessor for Gateway {
        async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSessionRef, GatewayError>;
    }
}
