use super::toml_config::TwinfieldConfig;
use crate::domain::bank_transaction::BankTransaction;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "twinfield")]
#[command(about = "Send bank transactions to Twinfield through the ProcessXml API")]
pub struct CliConfig {
    /// TOML 配置檔；省略時改用 TWINFIELD_* 環境變數
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON array of bank transactions
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, help = "Print the request XML instead of sending it")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 有 `--config` 時讀取檔案；dry run 不需要連線設定，因此不讀環境變數
    pub fn load_config(&self) -> Result<Option<TwinfieldConfig>> {
        match &self.config {
            Some(path) => TwinfieldConfig::from_file(path).map(Some),
            None if self.dry_run => Ok(None),
            None => TwinfieldConfig::from_env().map(Some),
        }
    }

    pub fn read_transactions(&self) -> Result<Vec<BankTransaction>> {
        let content = std::fs::read_to_string(&self.input)?;
        let transactions = serde_json::from_str(&content)?;
        Ok(transactions)
    }
}
