//! Line-oriented register screen on stdin/stdout.

pub mod render;

use std::io::{self, Write as _};

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::backend::{ApiEndpoint, HttpCatalog};
use crate::clients::{ClientError, RegisterClient};
use crate::messages::Acknowledgements;

use render::{render, render_health, render_products, render_receipt, HELP};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Code(String),
    Add,
    Buy,
    Show,
    Catalog,
    Health,
    Help,
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" | "show" | "s" => Input::Show,
            "add" | "a" => Input::Add,
            "buy" | "b" | "purchase" => Input::Buy,
            "catalog" => Input::Catalog,
            "health" => Input::Health,
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            _ => Input::Code(line.to_string()),
        }
    }
}

/// Backend calls that sit outside the checkout session.
pub struct Backend {
    pub api: ApiEndpoint,
    pub catalog: HttpCatalog,
}

/// Runs until the operator quits or stdin closes.
pub async fn run(
    client: &RegisterClient,
    acknowledgements: &mut Acknowledgements,
    backend: &Backend,
) -> Result<(), ConsoleError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut views = client.subscribe();

    println!("{HELP}");
    show(&render(&views.borrow_and_update()))?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                let input = Input::parse(&line);
                debug!(?input, "Operator input");
                match input {
                    Input::Code(code) => {
                        client.submit_code(code).await?;
                    }
                    Input::Add => {
                        client.add_to_cart().await?;
                    }
                    Input::Buy => {
                        client.purchase().await?;
                    }
                    Input::Show => show(&render(&client.snapshot().await?))?,
                    Input::Catalog => show_catalog(backend).await?,
                    Input::Health => show_health(backend).await?,
                    Input::Help => show(HELP)?,
                    Input::Quit => {
                        if client.current().busy {
                            show("処理中の呼び出しが終わるまでお待ちください")?;
                            client.settled().await?;
                        }
                        break;
                    }
                }
            }
            changed = views.changed() => {
                if changed.is_err() {
                    warn!("Register service stopped");
                    break;
                }
                let screen = render(&views.borrow_and_update());
                show(&screen)?;
            }
            Some(receipt) = acknowledgements.recv() => {
                show(&render_receipt(&receipt))?;
                // The notice holds the screen until the operator confirms it.
                if lines.next_line().await?.is_none() {
                    break;
                }
                info!(transaction_id = %receipt.transaction_id, "Purchase acknowledged");
            }
        }
    }

    Ok(())
}

fn show(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    write!(stdout, "> ")?;
    stdout.flush()
}

async fn show_catalog(backend: &Backend) -> io::Result<()> {
    match backend.catalog.list_products().await {
        Ok(products) => show(&render_products(&products)),
        Err(e) => {
            warn!(error = %e, "Product listing failed");
            show(&format!("[エラー] 商品一覧取得に失敗しました: {e}"))
        }
    }
}

async fn show_health(backend: &Backend) -> io::Result<()> {
    match backend.api.health().await {
        Ok(report) => {
            if !report.is_healthy() {
                warn!(status = %report.status, "Backend reports unhealthy");
            }
            show(&render_health(&report))
        }
        Err(e) => {
            warn!(error = %e, base = %backend.api.base(), "Health check failed");
            show(&format!("[エラー] バックエンドに接続できません: {e}"))
        }
    }
}
