// ============================================================================
// BUDGET - Resumen de presupuesto (suma de gastos en cliente)
// ============================================================================

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::{Expense, Profile};

const UNCATEGORIZED: &str = "other";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Porcentaje gastado, 2 decimales
    pub percent_used: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
    pub over_budget: bool,
    /// Gastos cuyo importe no se pudo interpretar o desbordaría la suma
    pub skipped: usize,
}

/// Interpreta un importe decimal en texto ("1,250.50", "$80")
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

impl BudgetSummary {
    pub fn compute(profile: &Profile, expenses: &[Expense]) -> Self {
        let budget = parse_amount(&profile.budget).unwrap_or_else(|| {
            log::warn!("⚠️ Presupuesto inválido '{}', se usa 0", profile.budget);
            Decimal::ZERO
        });

        let mut spent = Decimal::ZERO;
        let mut skipped = 0;
        let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

        for expense in expenses.iter().filter(|e| e.user_id == profile.id) {
            let Some(amount) = parse_amount(&expense.amount) else {
                log::warn!("⚠️ Importe inválido en gasto '{}': '{}'", expense.name, expense.amount);
                skipped += 1;
                continue;
            };
            let category = expense
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED);
            let subtotal = by_category.get(category).copied().unwrap_or(Decimal::ZERO);
            let (Some(new_spent), Some(new_subtotal)) =
                (spent.checked_add(amount), subtotal.checked_add(amount))
            else {
                log::warn!("⚠️ Importe fuera de rango en gasto '{}': '{}'", expense.name, expense.amount);
                skipped += 1;
                continue;
            };
            spent = new_spent;
            by_category.insert(category.to_string(), new_subtotal);
        }

        let percent_used = if budget.is_zero() {
            Decimal::ZERO
        } else {
            spent
                .checked_div(budget)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|percent| percent.round_dp(2))
                .unwrap_or_else(|| {
                    log::warn!("⚠️ Porcentaje de presupuesto fuera de rango, se satura");
                    if spent.is_sign_negative() != budget.is_sign_negative() {
                        Decimal::MIN
                    } else {
                        Decimal::MAX
                    }
                })
        };
        let remaining = budget.checked_sub(spent).unwrap_or(Decimal::MIN);

        Self {
            budget,
            spent,
            remaining,
            percent_used,
            by_category,
            over_budget: spent > budget,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(budget: &str) -> Profile {
        Profile {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            event_name: "Boda".to_string(),
            event_type: "wedding".to_string(),
            custom_event_type: None,
            event_date: "2026-06-20".to_string(),
            partner_name: None,
            budget: budget.to_string(),
            created_at: None,
        }
    }

    fn expense(owner: &str, amount: &str, category: Option<&str>) -> Expense {
        Expense {
            id: format!("e-{}", amount),
            user_id: owner.to_string(),
            name: "gasto".to_string(),
            amount: amount.to_string(),
            category: category.map(str::to_string),
            date: None,
        }
    }

    #[test]
    fn test_sums_exact_decimals_by_category() {
        let expenses = vec![
            expense("u1", "0.10", Some("flores")),
            expense("u1", "0.20", Some("flores")),
            expense("u1", "1,000.00", Some("catering")),
            expense("u1", "50", None),
        ];
        let summary = BudgetSummary::compute(&profile("2000"), &expenses);

        assert_eq!(summary.spent, Decimal::from_str("1050.30").unwrap());
        assert_eq!(summary.remaining, Decimal::from_str("949.70").unwrap());
        assert_eq!(summary.by_category["flores"], Decimal::from_str("0.30").unwrap());
        assert_eq!(summary.by_category["other"], Decimal::from(50));
        assert_eq!(summary.percent_used, Decimal::from_str("52.52").unwrap());
        assert!(!summary.over_budget);
    }

    #[test]
    fn test_skips_invalid_amounts_and_foreign_expenses() {
        let expenses = vec![
            expense("u1", "abc", None),
            expense("u2", "999", None),
            expense("u1", "$120", None),
        ];
        let summary = BudgetSummary::compute(&profile("100"), &expenses);
        assert_eq!(summary.spent, Decimal::from(120));
        assert_eq!(summary.skipped, 1);
        assert!(summary.over_budget);
        assert_eq!(summary.remaining, Decimal::from(-20));
    }

    #[test]
    fn test_zero_budget_has_zero_percent() {
        let summary = BudgetSummary::compute(&profile(""), &[expense("u1", "10", None)]);
        assert_eq!(summary.budget, Decimal::ZERO);
        assert_eq!(summary.percent_used, Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_amounts_are_skipped() {
        let huge = "79228162514264337593543950335";
        let expenses = vec![expense("u1", huge, Some("salon")), expense("u1", huge, Some("salon"))];
        let summary = BudgetSummary::compute(&profile("100"), &expenses);

        assert_eq!(summary.spent, Decimal::MAX);
        assert_eq!(summary.by_category["salon"], Decimal::MAX);
        assert_eq!(summary.skipped, 1);
        assert!(summary.over_budget);
        assert!(summary.percent_used > Decimal::from(1_000_000));
        assert_eq!(summary.remaining, Decimal::from(100) - Decimal::MAX);
    }

    #[test]
    fn test_percent_saturates_on_tiny_budget() {
        let huge = "79228162514264337593543950335";
        let summary = BudgetSummary::compute(&profile("0.5"), &[expense("u1", huge, None)]);
        assert_eq!(summary.spent, Decimal::MAX);
        assert_eq!(summary.percent_used, Decimal::MAX);
        assert!(summary.over_budget);
    }
}
