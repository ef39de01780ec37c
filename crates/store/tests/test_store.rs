use common::DashboardError;
use domain::{
    Bill, DomainError, Habit, HorseBet, NnsState, Payment, Plan, Principal, Task, TaskPriority,
    UserProfile, UserRole,
};
use store::DashboardStore;
use tempfile::TempDir;

async fn temp_store() -> (TempDir, DashboardStore) {
    temp_store_with_pool(2).await
}

async fn temp_store_with_pool(pool_size: u32) -> (TempDir, DashboardStore) {
    let temp_dir = TempDir::new().expect("temp dir");
    let store = DashboardStore::new(temp_dir.path().join("dash.db"), pool_size)
        .await
        .expect("store should open");
    (temp_dir, store)
}

fn alice() -> Principal {
    Principal::new("alice-principal")
}

fn bob() -> Principal {
    Principal::new("bob-principal")
}

#[tokio::test]
async fn test_first_registered_caller_is_admin() {
    let (_dir, store) = temp_store().await;

    assert_eq!(store.register_caller(&alice()).await.unwrap(), UserRole::Admin);
    assert_eq!(store.register_caller(&bob()).await.unwrap(), UserRole::User);
    // Повторная регистрация не меняет роль
    assert_eq!(store.register_caller(&alice()).await.unwrap(), UserRole::Admin);

    store.set_role(&bob(), UserRole::Guest).await.unwrap();
    assert_eq!(store.get_role(&bob()).await.unwrap(), Some(UserRole::Guest));
    assert_eq!(store.get_role(&Principal::new("nobody")).await.unwrap(), None);
}

#[tokio::test]
async fn test_profile_upsert() {
    let (_dir, store) = temp_store().await;
    assert!(store.get_profile(&alice()).await.unwrap().is_none());

    let profile = UserProfile {
        name: "Alice".to_string(),
        email: None,
    };
    store.save_profile(&alice(), &profile).await.unwrap();

    let updated = UserProfile {
        name: "Alice L.".to_string(),
        email: Some("alice@example.org".to_string()),
    };
    store.save_profile(&alice(), &updated).await.unwrap();
    assert_eq!(store.get_profile(&alice()).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn test_ids_are_per_owner_and_ascending() {
    let (_dir, store) = temp_store().await;

    let a1 = store.insert_bill(&alice(), Bill::new("Rent", 900.0, "")).await.unwrap();
    let a2 = store.insert_bill(&alice(), Bill::new("Power", 60.0, "")).await.unwrap();
    let b1 = store.insert_bill(&bob(), Bill::new("Gym", 30.0, "")).await.unwrap();

    assert_eq!((a1.id, a2.id, b1.id), (1, 2, 1));

    let bills = store.list_bills(&alice()).await.unwrap();
    assert_eq!(bills.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(store.list_bills(&bob()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_record_payment_is_atomic_with_balance() {
    let (_dir, store) = temp_store().await;
    let bill = store
        .insert_bill(&alice(), Bill::new("Card", 100.0, "visa"))
        .await
        .unwrap();

    let payment = Payment {
        id: 0,
        bill_id: bill.id,
        amount: 25.0,
        timestamp: 42,
    };
    let (updated, stored) = store.record_payment(&alice(), payment).await.unwrap();
    assert_eq!(stored.id, 1);
    assert_eq!(updated.remaining_balance, 75.0);

    let reloaded = store.get_bill(&alice(), bill.id).await.unwrap().unwrap();
    assert_eq!(reloaded, updated);
    assert_eq!(store.list_payments(&alice(), bill.id).await.unwrap(), vec![stored]);

    // Остаток берётся из базы, а не из копии вызывающего
    let too_much = Payment { id: 0, bill_id: bill.id, amount: 80.0, timestamp: 0 };
    assert!(matches!(
        store.record_payment(&alice(), too_much).await,
        Err(DashboardError::Domain(DomainError::PaymentExceedsBalance { .. }))
    ));
    assert_eq!(store.list_payments(&alice(), bill.id).await.unwrap().len(), 1);

    // Чужой счёт не найден
    let missing = store
        .record_payment(&bob(), Payment { id: 0, bill_id: bill.id, amount: 1.0, timestamp: 0 })
        .await;
    assert!(matches!(missing, Err(DashboardError::NotFound(_))));
    assert!(store.list_payments(&bob(), bill.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_revise_bill_keeps_recorded_payments() {
    let (_dir, store) = temp_store().await;
    let bill = store
        .insert_bill(&alice(), Bill::new("Rent", 900.0, "March"))
        .await
        .unwrap();
    store
        .record_payment(&alice(), Payment { id: 0, bill_id: bill.id, amount: 300.0, timestamp: 1 })
        .await
        .unwrap();

    // Вызывающий передаёт черновик без сведений об оплате
    let revised = store
        .revise_bill(&alice(), bill.id, &Bill::new("Rent", 1000.0, "April"))
        .await
        .unwrap();
    assert_eq!(revised.remaining_balance, 700.0);
    assert_eq!(revised.description, "April");
    assert_eq!(revised.created_at, bill.created_at);

    assert!(matches!(
        store.revise_bill(&bob(), bill.id, &Bill::new("Rent", 1.0, "")).await,
        Err(DashboardError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_nns_rows_replace_wholesale() {
    let (_dir, store) = temp_store().await;
    assert!(store.get_nns_state(&alice()).await.unwrap().is_none());

    let state = NnsState { staked_icp: 10.0, last_updated: 1 };
    store.put_nns_state(&alice(), &state).await.unwrap();
    let state = NnsState { staked_icp: 12.5, last_updated: 2 };
    store.put_nns_state(&alice(), &state).await.unwrap();

    assert_eq!(store.get_nns_state(&alice()).await.unwrap(), Some(state));
}

#[tokio::test]
async fn test_tasks_habits_bets() {
    let (_dir, store) = temp_store().await;

    let task = store
        .insert_task(&alice(), Task::new("Ship", "", "Work", TaskPriority::High))
        .await
        .unwrap();
    assert!(store.complete_task(&alice(), task.id).await.unwrap());
    // Повторная отметка ничего не меняет
    assert!(!store.complete_task(&alice(), task.id).await.unwrap());
    assert!(!store.complete_task(&alice(), 99).await.unwrap());
    assert!(store.get_task(&alice(), task.id).await.unwrap().unwrap().is_complete);

    let habit = store.insert_habit(&alice(), Habit::new("Read", 2)).await.unwrap();
    let habit = store
        .record_habit_progress(&alice(), habit.id, 2, 5)
        .await
        .unwrap();
    assert_eq!((habit.progress, habit.streak, habit.last_updated), (2, 1, 5));
    // Цель уже достигнута: серия не растёт повторно
    store.record_habit_progress(&alice(), habit.id, 3, 6).await.unwrap();
    assert_eq!(store.list_habits(&alice()).await.unwrap()[0].streak, 1);
    assert!(store.record_habit_progress(&bob(), habit.id, 1, 7).await.is_err());

    let bet = HorseBet {
        id: 0,
        horse_name: "Red Rum".to_string(),
        amount: 10.0,
        odds: 4.5,
        is_win: true,
        timestamp: 1,
    };
    let stored = store.insert_bet(&alice(), bet).await.unwrap();
    assert_eq!(stored.id, 1);
    assert_eq!(store.list_bets(&alice()).await.unwrap(), vec![stored]);
}

#[tokio::test]
async fn test_plan_links_round_trip_and_delete() {
    let store = DashboardStore::in_memory().expect("in-memory store");

    let mut plan = Plan::new("Trip");
    plan.links = vec!["https://maps.example.org".to_string()];
    let mut plan = store.insert_plan(&alice(), plan).await.unwrap();

    plan.notes = "Book hotel".to_string();
    plan.links.push("https://hotel.example.org".to_string());
    assert!(store.update_plan(&alice(), &plan).await.unwrap());
    assert_eq!(store.get_plan(&alice(), plan.id).await.unwrap(), Some(plan.clone()));

    assert!(store.delete_plan(&alice(), plan.id).await.unwrap());
    assert!(!store.delete_plan(&alice(), plan.id).await.unwrap());
    assert!(store.list_plans(&alice()).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_do_not_fail() {
    let (_dir, store) = temp_store_with_pool(8).await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let owner = if i % 4 == 0 { bob() } else { alice() };
            let bill = store
                .insert_bill(&owner, Bill::new(format!("Bill {i}"), 10.0, ""))
                .await?;
            Ok::<_, DashboardError>((owner, bill.id))
        }));
    }

    let mut alice_ids = Vec::new();
    let mut bob_ids = Vec::new();
    for handle in handles {
        let (owner, id) = handle.await.unwrap().expect("insert under contention");
        if owner == alice() {
            alice_ids.push(id);
        } else {
            bob_ids.push(id);
        }
    }
    alice_ids.sort_unstable();
    bob_ids.sort_unstable();
    assert_eq!(alice_ids, (1..=24).collect::<Vec<_>>());
    assert_eq!(bob_ids, (1..=8).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_sum_to_paid_amount() {
    let (_dir, store) = temp_store_with_pool(8).await;
    let bill = store
        .insert_bill(&alice(), Bill::new("Loan", 50.0, ""))
        .await
        .unwrap();
    let bill_id = bill.id;

    let mut handles = Vec::new();
    for _ in 0..12 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .record_payment(&alice(), Payment { id: 0, bill_id, amount: 5.0, timestamp: 1 })
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(DashboardError::Domain(DomainError::PaymentExceedsBalance { .. })) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(accepted, 10);

    let bill = store.get_bill(&alice(), bill_id).await.unwrap().unwrap();
    let payments = store.list_payments(&alice(), bill_id).await.unwrap();
    let paid: f64 = payments.iter().map(|p| p.amount).sum();
    assert_eq!(paid, bill.total_amount - bill.remaining_balance);
    assert!(bill.is_paid);

    let mut ids: Vec<_> = payments.iter().map(|p| p.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}
