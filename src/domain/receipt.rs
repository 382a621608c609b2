/// Summary handed back by the purchase service after a sale is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub total_amount: u64,
    pub transaction_id: String,
    pub message: Option<String>,
}
