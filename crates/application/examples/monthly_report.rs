use application::LedgerApp;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Walks one month of a two-person household: create the group, join both
/// members, define an on-purchase incentive, record some purchases and print
/// the settlement.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = LedgerApp::new("flatledger-demo.db");
    let service = &app.ledger_service;

    let alice = service
        .create_user("alice".to_string(), "Alice".to_string())
        .await?;
    let bob = service
        .create_user("bob".to_string(), "Bob".to_string())
        .await?;
    let flat = service.create_group("Maple St 12".to_string(), Some(4)).await?;

    let month_start = NaiveDate::from_ymd_opt(2024, 6, 1).ok_or("bad date")?;
    service.join_group(alice.id, flat.id, Some(month_start)).await?;
    service.join_group(bob.id, flat.id, Some(month_start)).await?;

    service
        .record_incentive_definition(
            flat.id,
            "shopping run bonus".to_string(),
            Decimal::new(200, 2),
            month_start,
            None,
            true,
            Some("Small credit for whoever does the shopping".to_string()),
        )
        .await?;

    service
        .record_purchase(
            alice.id,
            flat.id,
            Decimal::new(5430, 2),
            Some("GroceryCo".to_string()),
            NaiveDate::from_ymd_opt(2024, 6, 5),
            Some("weekly shop".to_string()),
        )
        .await?;
    service
        .record_purchase(
            bob.id,
            flat.id,
            Decimal::new(1299, 2),
            Some("CleanMart".to_string()),
            NaiveDate::from_ymd_opt(2024, 6, 12),
            None,
        )
        .await?;

    let month_end = NaiveDate::from_ymd_opt(2024, 6, 30).ok_or("bad date")?;
    let snapshot = service.range_snapshot(flat.id, month_start, month_end).await?;

    println!("Group: {}", snapshot.group.name);
    println!(
        "Total expense: {} across {} members (share {})",
        snapshot.settlement.total, snapshot.settlement.member_count, snapshot.settlement.group_share
    );
    for row in &snapshot.settlement.per_member {
        println!(
            "  {}: contributed {} ({} purchases, {} incentives), owes {}",
            row.username, row.total_contribution, row.count_purchases, row.count_incentives, row.owes
        );
    }
    println!("{} transaction records in range", snapshot.records.len());

    Ok(())
}
