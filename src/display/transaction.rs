//! Transaction list formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::{Category, Transaction};

#[derive(Tabled)]
struct TransactionLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Payee")]
    payee: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Memo")]
    memo: String,
}

/// Format transactions as a table, resolving category names
pub fn format_transaction_list(transactions: &[Transaction], categories: &[Category]) -> String {
    if transactions.is_empty() {
        return "No transactions in this period.\n".to_string();
    }

    let lines = transactions.iter().map(|txn| TransactionLine {
        date: txn.date.format("%Y-%m-%d").to_string(),
        category: categories
            .iter()
            .find(|c| c.id == txn.category_id)
            .map_or_else(|| "(deleted)".to_string(), |c| c.name.clone()),
        payee: txn.payee.clone(),
        amount: txn.amount.to_string(),
        memo: txn.memo.clone(),
    });

    let mut output = Table::new(lines).with(Style::modern()).to_string();
    output.push('\n');
    output
}
