//! Property-based tests for the landed-cost allocation pass.
//!
//! - Conservation: allocated amounts sum to the component total
//! - Proportionality: a basis twice as large receives twice the cost
//! - Idempotence: recalculating a calculated record changes nothing
//! - Zero components leave item costs untouched

use proptest::prelude::*;
use rust_decimal::Decimal;

use jusfinn_shared::LandedCostConfig;
use jusfinn_shared::types::Currency;

use super::service::LandedCostService;
use super::types::{AllocationMethod, CostComponent, CostType, LineItem, ShipmentCostRecord};

/// Strategy to generate a positive amount in paise (0.01 to 10,00,00,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Strategy to generate a line item with quantity, unit cost and weight.
fn line_item() -> impl Strategy<Value = LineItem> {
    (1i64..1_000, 1i64..10_000_000, 1i64..100_000).prop_map(|(qty, unit_paise, weight)| {
        LineItem::new("item", Decimal::from(qty), Decimal::new(unit_paise, 2))
            .with_weight(Decimal::from(weight))
    })
}

/// Strategy to generate a computed allocation method.
fn computed_method() -> impl Strategy<Value = AllocationMethod> {
    prop_oneof![
        Just(AllocationMethod::Value),
        Just(AllocationMethod::Weight),
        Just(AllocationMethod::Quantity),
    ]
}

fn component(amount: Decimal, method: AllocationMethod) -> CostComponent {
    CostComponent::new(CostType::Freight, amount, Decimal::ZERO, method)
}

fn record(items: Vec<LineItem>, components: Vec<CostComponent>) -> ShipmentCostRecord {
    let mut record = ShipmentCostRecord::new(Currency::Inr, items);
    record.cost_components = components;
    record
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* record whose components share one method, the allocated
    /// amounts SHALL sum exactly to the component total.
    #[test]
    fn prop_allocation_conserves_cost(
        items in prop::collection::vec(line_item(), 1..20),
        amounts in prop::collection::vec(positive_amount(), 1..5),
        method in computed_method(),
    ) {
        let components: Vec<_> = amounts.iter().map(|a| component(*a, method)).collect();
        let expected: Decimal = amounts.iter().copied().sum();

        let result = LandedCostService::calculate(
            &record(items, components),
            &LandedCostConfig::default(),
        ).unwrap();

        let allocated: Decimal = result.items.iter().map(|i| i.allocated_landed_cost).sum();
        prop_assert_eq!(allocated, expected);
        prop_assert_eq!(result.total_landed_cost, result.shipment_value + expected);
    }

    /// *For any* two items where one has exactly double the quantity of the
    /// other, and a total divisible into thirds, the larger SHALL receive
    /// exactly double.
    #[test]
    fn prop_allocation_is_proportional(
        qty in 1i64..10_000,
        thirds in 1i64..1_000_000_000,
        unit_paise in 1i64..1_000_000,
    ) {
        let unit_cost = Decimal::new(unit_paise, 2);
        let items = vec![
            LineItem::new("double", Decimal::from(qty * 2), unit_cost),
            LineItem::new("single", Decimal::from(qty), unit_cost),
        ];
        let total = Decimal::new(thirds * 3, 2);

        let result = LandedCostService::calculate(
            &record(items, vec![component(total, AllocationMethod::Quantity)]),
            &LandedCostConfig::default(),
        ).unwrap();

        let double = result.items[0].allocated_landed_cost;
        let single = result.items[1].allocated_landed_cost;
        prop_assert_eq!(double, single * Decimal::TWO);
    }

    /// *For any* record, calculating a calculated record SHALL yield the same record.
    #[test]
    fn prop_calculation_is_idempotent(
        items in prop::collection::vec(line_item(), 1..10),
        amounts in prop::collection::vec((positive_amount(), computed_method()), 0..6),
    ) {
        let components = amounts.iter().map(|(a, m)| component(*a, *m)).collect();
        let config = LandedCostConfig::default();

        let first = LandedCostService::calculate(&record(items, components), &config).unwrap();
        let second = LandedCostService::calculate(&first, &config).unwrap();

        prop_assert_eq!(first, second);
    }

    /// *For any* record without components, no cost SHALL be allocated.
    #[test]
    fn prop_no_components_no_allocation(
        items in prop::collection::vec(line_item(), 1..20),
    ) {
        let result = LandedCostService::calculate(
            &record(items, vec![]),
            &LandedCostConfig::default(),
        ).unwrap();

        for item in &result.items {
            prop_assert_eq!(item.allocated_landed_cost, Decimal::ZERO);
            prop_assert_eq!(item.final_total_cost, item.total_cost);
        }
        prop_assert_eq!(result.landed_cost_percentage, Decimal::ZERO);
    }
}
