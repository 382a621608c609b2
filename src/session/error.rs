use thiserror::Error;

use crate::domain::CODE_LENGTH;

/// Everything that can go wrong inside a checkout. The `Display` text is what
/// the operator sees; the extra fields are for the logs only.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("商品コードは{}桁で入力してください", CODE_LENGTH)]
    Validation { length: usize },
    #[error("該当する商品が見つかりませんでした")]
    NotFound,
    #[error("商品検索に失敗しました")]
    LookupTransport { reason: String },
    #[error("購入処理に失敗しました")]
    PurchaseTransport { reason: String },
    #[error("購入処理に失敗しました")]
    PurchaseRejected { reason: String },
    #[error("カートに商品がありません")]
    EmptyCart,
    #[error("商品を読み込んでください")]
    NothingStaged,
    #[error("処理中です。しばらくお待ちください")]
    Busy,
}
