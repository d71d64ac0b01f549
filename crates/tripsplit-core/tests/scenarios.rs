//! End-to-end scenarios over whole tours: balances, plans, summaries and
//! recording a suggested settlement as a payment.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tripsplit_core::{
    calculate_balances, calculate_settlements, calculate_settlements_with, summarize,
    validation::validate_tour, Currency, Expense, ExpenseCategory, ExpenseSplit, MatchingStrategy,
    Money, PaymentMethod, PaymentRecord, Settlement, SettlementConfig, Tour, Traveler,
};

// =============================================================================
// Fixtures
// =============================================================================

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
}

fn usd_tour() -> Tour {
    let mut tour = Tour::new("tour-1", "Road trip", "USD");
    tour.currencies.push(Currency::new("EUR", "Euro", dec!(0.9)));
    tour.travelers = vec![
        Traveler::new("alice", "Alice"),
        Traveler::new("bob", "Bob"),
        Traveler::new("carol", "Carol"),
    ];
    tour
}

fn expense(id: &str, paid_by: &str, amount: Decimal, code: &str, splits: &[(&str, Decimal)]) -> Expense {
    Expense {
        id: id.to_string(),
        description: format!("expense {id}"),
        amount: Money::new(amount),
        currency_code: code.to_string(),
        base_amount: None,
        date: date(1),
        paid_by_id: paid_by.to_string(),
        category: ExpenseCategory::Other,
        splits: splits
            .iter()
            .map(|(traveler, share)| ExpenseSplit::new(*traveler, Money::new(*share)))
            .collect(),
    }
}

fn payment(id: &str, from: &str, to: &str, amount: Decimal, code: &str) -> PaymentRecord {
    PaymentRecord {
        id: id.to_string(),
        from_traveler_id: from.to_string(),
        to_traveler_id: to.to_string(),
        amount: Money::new(amount),
        currency_code: code.to_string(),
        date: date(2),
        method: PaymentMethod::BankTransfer,
        notes: None,
    }
}

fn sorted(mut plan: Vec<Settlement>) -> Vec<(String, String, Decimal)> {
    plan.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
    plan.into_iter()
        .map(|s| (s.from, s.to, s.amount.amount()))
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn tour_without_activity_has_nothing_to_settle() {
    let tour = usd_tour();

    let balances = calculate_balances(&tour);
    assert_eq!(balances.len(), 3);
    assert!(balances.values().all(|b| b.is_zero()));
    assert!(calculate_settlements(&tour).is_empty());
}

#[test]
fn tour_without_travelers_has_nothing_to_settle() {
    let tour = Tour::new("empty", "Nobody came", "USD");
    assert!(calculate_balances(&tour).is_empty());
    assert!(calculate_settlements(&tour).is_empty());
}

#[test]
fn equal_split_in_base_currency() {
    let mut tour = usd_tour();
    tour.expenses.push(expense(
        "e1",
        "alice",
        dec!(300),
        "USD",
        &[("alice", dec!(100)), ("bob", dec!(100)), ("carol", dec!(100))],
    ));
    validate_tour(&tour).unwrap();

    let balances = calculate_balances(&tour);
    assert_eq!(balances["alice"].amount(), dec!(200));
    assert_eq!(balances["bob"].amount(), dec!(-100));
    assert_eq!(balances["carol"].amount(), dec!(-100));

    let plan = calculate_settlements(&tour);
    assert!(plan.iter().all(|s| s.currency_code == "USD"));
    assert_eq!(
        sorted(plan),
        vec![
            ("bob".to_string(), "alice".to_string(), dec!(100)),
            ("carol".to_string(), "alice".to_string(), dec!(100)),
        ]
    );
}

#[test]
fn foreign_currency_expense_is_normalized() {
    let mut tour = usd_tour();
    tour.expenses.push(expense(
        "e1",
        "bob",
        dec!(90),
        "EUR",
        &[("alice", dec!(45)), ("bob", dec!(45))],
    ));
    validate_tour(&tour).unwrap();

    let balances = calculate_balances(&tour);
    assert_eq!(balances["bob"].amount(), dec!(50));
    assert_eq!(balances["alice"].amount(), dec!(-50));
    assert!(balances["carol"].is_zero());

    assert_eq!(
        sorted(calculate_settlements(&tour)),
        vec![("alice".to_string(), "bob".to_string(), dec!(50))]
    );
}

#[test]
fn recorded_payment_nets_out_the_debt() {
    let mut tour = usd_tour();
    tour.expenses.push(expense(
        "e1",
        "alice",
        dec!(200),
        "USD",
        &[("alice", dec!(100)), ("bob", dec!(100))],
    ));
    assert_eq!(calculate_balances(&tour)["bob"].amount(), dec!(-100));

    tour.payments.push(payment("p1", "bob", "alice", dec!(100), "USD"));

    let balances = calculate_balances(&tour);
    assert!(balances["alice"].is_zero());
    assert!(balances["bob"].is_zero());
    assert!(calculate_settlements(&tour).is_empty());
}

#[test]
fn recording_every_suggestion_settles_the_tour() {
    let mut tour = usd_tour();
    tour.expenses.push(expense(
        "e1",
        "alice",
        dec!(120),
        "USD",
        &[("alice", dec!(40)), ("bob", dec!(40)), ("carol", dec!(40))],
    ));
    tour.expenses.push(expense(
        "e2",
        "carol",
        dec!(81),
        "EUR",
        &[("alice", dec!(27)), ("bob", dec!(27)), ("carol", dec!(27))],
    ));

    let plan = calculate_settlements(&tour);
    assert!(!plan.is_empty());

    for settlement in plan {
        let record = settlement.into_payment(date(3), PaymentMethod::Cash, None);
        tour.payments.push(record);
    }

    assert!(calculate_balances(&tour).values().all(|b| b.is_negligible()));
    assert!(calculate_settlements(&tour).is_empty());
}

#[test]
fn both_strategies_settle_mixed_ledger() {
    let mut tour = usd_tour();
    tour.travelers.push(Traveler::new("dave", "Dave"));
    tour.travelers.push(Traveler::new("erin", "Erin"));
    tour.expenses.push(expense(
        "e1",
        "alice",
        dec!(250),
        "USD",
        &[("alice", dec!(50)), ("bob", dec!(100)), ("dave", dec!(100))],
    ));
    tour.expenses.push(expense(
        "e2",
        "bob",
        dec!(135),
        "EUR",
        &[("carol", dec!(45)), ("erin", dec!(90))],
    ));
    tour.expenses.push(expense(
        "e3",
        "erin",
        dec!(60),
        "USD",
        &[("alice", dec!(20)), ("carol", dec!(20)), ("erin", dec!(20))],
    ));

    let balances = calculate_balances(&tour);
    for strategy in [MatchingStrategy::HeadOrder, MatchingStrategy::Resort] {
        let config = SettlementConfig {
            strategy,
            ..SettlementConfig::default()
        };
        let plan = calculate_settlements_with(&tour, &config);

        let mut after = balances.clone();
        for s in &plan {
            *after.get_mut(&s.from).unwrap() += s.amount;
            *after.get_mut(&s.to).unwrap() -= s.amount;
        }
        assert!(after.values().all(|b| b.is_negligible()), "{strategy}: {after:?}");

        let open = balances.values().filter(|b| !b.is_zero()).count();
        assert!(plan.len() < open, "{strategy}: {} transfers", plan.len());
    }
}

#[test]
fn excluded_cent_stays_with_the_creditor() {
    let mut tour = Tour::new("tour-2", "Osaka", "USD");
    tour.currencies.push(Currency::new("JPY", "Yen", dec!(150.32)));
    tour.travelers = ["t0", "t1", "t2", "t3"]
        .iter()
        .map(|id| Traveler::new(*id, *id))
        .collect();
    tour.expenses.push(expense(
        "e1",
        "t0",
        dec!(166.59),
        "JPY",
        &[("t1", dec!(83.30)), ("t3", dec!(83.29))],
    ));
    tour.payments.push(payment("p1", "t1", "t2", dec!(81.05), "JPY"));

    let balances = calculate_balances(&tour);
    assert_eq!(balances["t0"].amount(), dec!(1.11));
    assert_eq!(balances["t1"].amount(), dec!(-0.01));
    assert_eq!(balances["t2"].amount(), dec!(-0.54));
    assert_eq!(balances["t3"].amount(), dec!(-0.55));

    let plan = calculate_settlements(&tour);
    assert_eq!(
        sorted(plan.clone()),
        vec![
            ("t2".to_string(), "t0".to_string(), dec!(0.54)),
            ("t3".to_string(), "t0".to_string(), dec!(0.55)),
        ]
    );

    // t1's cent is below the tolerance and the map itself is a cent off zero
    let received: Money = plan.iter().map(|s| s.amount).sum();
    assert_eq!((balances["t0"] - received).amount(), dec!(0.02));
}

#[test]
fn summary_rows_agree_with_balances() {
    let mut tour = usd_tour();
    tour.expenses.push(expense(
        "e1",
        "alice",
        dec!(99.99),
        "EUR",
        &[("alice", dec!(33.33)), ("bob", dec!(33.33)), ("carol", dec!(33.33))],
    ));
    tour.payments.push(payment("p1", "bob", "alice", dec!(20), "USD"));

    let balances = calculate_balances(&tour);
    let rows = summarize(&tour);
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row.net, balances[&row.traveler_id], "{}", row.name);
    }
}

#[test]
fn frontend_snapshot_round_trips_through_engine() {
    let json = r#"{
        "id": "tour-9",
        "name": "Alps",
        "baseCurrencyCode": "EUR",
        "travelers": [
            { "id": "t1", "name": "Mia" },
            { "id": "t2", "name": "Noah" }
        ],
        "currencies": [
            { "code": "EUR", "name": "Euro", "exchangeRate": 1 },
            { "code": "CHF", "name": "Swiss Franc", "exchangeRate": 0.95 }
        ],
        "expenses": [{
            "id": "x1",
            "amount": 190,
            "currencyCode": "CHF",
            "baseAmount": 200,
            "date": "2024-01-15",
            "paidById": "t1",
            "category": "accommodation",
            "splits": [
                { "travelerId": "t1", "amount": 95 },
                { "travelerId": "t2", "amount": 95, "baseAmount": 100 }
            ]
        }]
    }"#;

    let tour = Tour::from_json(json).unwrap();
    let plan = calculate_settlements(&tour);

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].from, "t2");
    assert_eq!(plan[0].to, "t1");
    assert_eq!(plan[0].amount.amount(), dec!(100));
    assert_eq!(plan[0].currency_code, "EUR");

    let encoded = serde_json::to_value(&plan).unwrap();
    assert_eq!(encoded[0]["currencyCode"], "EUR");
}
