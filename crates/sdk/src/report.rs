//! Balance reports printed after a sale command

use std::fmt;

use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

/// Balance of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Balance {
    /// Token amount as reported by the token program
    Tokens(String),
    /// Native balance
    Lamports(u64),
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Tokens(amount) => write!(f, "{} tokens", amount),
            Balance::Lamports(lamports) => write!(f, "{} SOL", format_sol(*lamports)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub label: String,
    pub address: Pubkey,
    pub balance: Balance,
}

impl BalanceRow {
    pub fn tokens(label: impl Into<String>, address: Pubkey, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            address,
            balance: Balance::Tokens(amount.into()),
        }
    }

    pub fn lamports(label: impl Into<String>, address: Pubkey, lamports: u64) -> Self {
        Self {
            label: label.into(),
            address,
            balance: Balance::Lamports(lamports),
        }
    }
}

/// Rows rendered as an aligned table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceReport {
    rows: Vec<BalanceRow>,
}

impl BalanceReport {
    pub fn push(&mut self, row: BalanceRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[BalanceRow] {
        &self.rows
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
        for row in &self.rows {
            writeln!(
                f,
                "{:<width$}  {:<44}  {}",
                row.label,
                row.address.to_string(),
                row.balance,
                width = width
            )?;
        }
        Ok(())
    }
}

/// Exact decimal SOL rendering of a lamport amount
pub fn format_sol(lamports: u64) -> String {
    format!(
        "{}.{:09}",
        lamports / LAMPORTS_PER_SOL,
        lamports % LAMPORTS_PER_SOL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sol() {
        assert_eq!(format_sol(0), "0.000000000");
        assert_eq!(format_sol(7_500_000), "0.007500000");
        assert_eq!(format_sol(2 * LAMPORTS_PER_SOL + 1), "2.000000001");
    }

    #[test]
    fn test_report_keeps_order_and_aligns_labels() {
        let seller = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();
        let mut report = BalanceReport::default();
        report.push(BalanceRow::tokens("buyer tokens", buyer, "10"));
        report.push(BalanceRow::lamports("seller", seller, LAMPORTS_PER_SOL));

        let rendered = report.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("buyer tokens  "));
        assert!(lines[0].ends_with("10 tokens"));
        assert!(lines[1].starts_with("seller        "));
        assert!(lines[1].contains(&seller.to_string()));
        assert!(lines[1].ends_with("1.000000000 SOL"));
    }
}
