use std::fmt::Write;

use crate::backend::HealthReport;
use crate::domain::{yen, Product, Receipt};
use crate::session::SessionView;

const RULE: &str = "────────────────────────────────────────";

/// Text version of the register screen.
pub fn render(view: &SessionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "商品コード: {}", or_dash(&view.code_input));
    let _ = writeln!(
        out,
        "商品名称:   {}",
        view.staged.as_ref().map_or("-", |p| p.name.as_str())
    );
    let _ = writeln!(
        out,
        "商品単価:   {}",
        view.staged
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| yen(p.unit_price))
    );

    let _ = writeln!(out, "── 購入リスト ──");
    if view.lines.is_empty() {
        let _ = writeln!(out, "カートは空です");
    } else {
        for line in &view.lines {
            let price = yen(line.unit_price);
            let _ = writeln!(out, "{}  x1 {}  {}", line.name, price, price);
        }
        let _ = writeln!(out, "合計: {}", yen(view.total_amount));
    }

    if let Some(message) = &view.message {
        let marker = if message.is_error() { "[エラー]" } else { "[OK]" };
        let _ = writeln!(out, "{marker} {}", message.text);
    }
    if view.busy {
        let _ = writeln!(out, "処理中...");
    }
    let _ = write!(out, "{}", affordances(view));
    out
}

/// Which actions are currently available, mirroring the enabled buttons.
fn affordances(view: &SessionView) -> String {
    let mut actions = Vec::new();
    if !view.busy {
        actions.push("<コード>");
    }
    if view.can_add() {
        actions.push("add");
    }
    if view.can_purchase() {
        actions.push("buy");
    }
    if actions.is_empty() {
        String::new()
    } else {
        format!("操作: {}\n", actions.join(" / "))
    }
}

/// Blocking purchase notice.
pub fn render_receipt(receipt: &Receipt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "購入完了！");
    let _ = writeln!(out, "合計金額: {}", yen(receipt.total_amount));
    let _ = writeln!(out, "取引ID: {}", receipt.transaction_id);
    let _ = writeln!(out, "{RULE}");
    let _ = write!(out, "Enter で続行");
    out
}

pub fn render_health(report: &HealthReport) -> String {
    let mut out = format!("backend: {}", report.status);
    if let Some(database) = &report.database {
        let _ = write!(out, " (database: {database})");
    }
    if let Some(error) = &report.error {
        let _ = write!(out, " error: {error}");
    }
    out
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "登録商品はありません".to_string();
    }
    let mut out = String::new();
    for product in products {
        let _ = writeln!(out, "{}  {}  {}", product.code, product.name, yen(product.unit_price));
    }
    out
}

pub const HELP: &str = "\
<13桁のコード>  商品コード読み込み
add             カートに追加
buy             購入
show            画面を再表示
catalog         商品マスタ一覧
health          バックエンドの状態確認
quit            終了";

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CartLine, ProductCode};
    use crate::session::{Phase, StatusMessage};

    fn tea() -> Product {
        Product::new("P1", ProductCode::parse("4901234567894").unwrap(), "Tea", 150)
    }

    #[test]
    fn empty_session_shows_placeholders() {
        let screen = render(&SessionView::default());
        assert!(screen.contains("商品名称:   -"));
        assert!(screen.contains("商品単価:   -"));
        assert!(screen.contains("カートは空です"));
        assert!(!screen.contains("合計"));
        assert!(!screen.contains("add"));
        assert!(!screen.contains("buy"));
    }

    #[test]
    fn staged_product_shows_name_and_yen_price() {
        let view = SessionView {
            phase: Phase::ReadyToAdd,
            code_input: "4901234567894".into(),
            staged: Some(tea()),
            message: Some(StatusMessage::notice("商品が見つかりました: Tea")),
            ..SessionView::default()
        };
        let screen = render(&view);
        assert!(screen.contains("商品名称:   Tea"));
        assert!(screen.contains("商品単価:   150円"));
        assert!(screen.contains("[OK] 商品が見つかりました: Tea"));
        assert!(screen.contains("add"));
    }

    #[test]
    fn cart_lines_and_total_use_grouped_amounts() {
        let line = CartLine::from(&Product::new(1, ProductCode::parse("4901234567890").unwrap(), "ソフコン", 1500));
        let view = SessionView {
            lines: vec![line.clone(), line],
            total_amount: 3000,
            ..SessionView::default()
        };
        let screen = render(&view);
        assert!(screen.contains("ソフコン  x1 1,500円  1,500円"));
        assert!(screen.contains("合計: 3,000円"));
        assert!(screen.contains("buy"));
    }

    #[test]
    fn busy_session_offers_no_actions() {
        let view = SessionView {
            phase: Phase::Purchasing,
            busy: true,
            lines: vec![CartLine::from(&tea())],
            total_amount: 150,
            ..SessionView::default()
        };
        let screen = render(&view);
        assert!(screen.contains("処理中..."));
        assert!(!screen.contains("操作:"));
    }

    #[test]
    fn receipt_notice_carries_total_and_transaction() {
        let notice = render_receipt(&Receipt {
            total_amount: 150,
            transaction_id: "42".into(),
            message: None,
        });
        assert!(notice.contains("購入完了！"));
        assert!(notice.contains("合計金額: 150円"));
        assert!(notice.contains("取引ID: 42"));
    }
}
