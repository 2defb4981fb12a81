//! Demo subscribers and invoices for the in-memory store.

use chrono::{Days, NaiveDate};
use netbill_core::domain::{Client, ClientStatus, Payment, PaymentMethod, PaymentStatus};
use netbill_core::impls::InMemoryStore;

fn client(id: &str, name: &str, lease_id: &str, plan: &str, fee: u64, status: ClientStatus, registered: NaiveDate) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        address: "Jl. Kenanga No. 12".to_string(),
        phone: "081234567890".to_string(),
        email: format!("{id}@example.net"),
        lease_id: Some(lease_id.to_string()),
        plan: plan.to_string(),
        monthly_fee: fee,
        registration_date: registered,
        status,
    }
}

/// Three subscribers bound to the demo leases. Siti is behind on last
/// month's invoice and already suspended, so a block run has work to do.
pub async fn seed_demo_data(store: &InMemoryStore, today: NaiveDate) {
    let registered = today.checked_sub_days(Days::new(180)).unwrap_or(today);
    let last_month = today.checked_sub_days(Days::new(30)).unwrap_or(today);
    let next_week = today.checked_add_days(Days::new(7)).unwrap_or(today);

    let clients = [
        client("c-001", "Budi Santoso", "*1", "10M/5M", 150_000, ClientStatus::Active, registered),
        client("c-002", "Siti Rahma", "*2", "5M/2M", 100_000, ClientStatus::Suspended, registered),
        client("c-003", "Agus Wijaya", "*3", "20M/10M", 250_000, ClientStatus::Active, registered),
    ];
    for c in clients {
        store.insert_client(c).await;
    }

    let invoices = [
        ("pay-001", "c-001", 150_000, last_month, PaymentStatus::Confirmed, PaymentMethod::Qris),
        ("pay-002", "c-002", 100_000, last_month, PaymentStatus::Pending, PaymentMethod::BankTransfer),
        ("pay-003", "c-003", 250_000, next_week, PaymentStatus::Pending, PaymentMethod::EWallet),
    ];
    for (id, client_id, amount, due, status, method) in invoices {
        store
            .insert_payment(Payment {
                id: id.to_string(),
                client_id: client_id.to_string(),
                amount,
                date: due,
                due_date: due,
                method,
                reference: format!("INV-{id}"),
                status,
                notes: None,
            })
            .await;
    }
}
