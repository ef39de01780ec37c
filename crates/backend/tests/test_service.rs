use async_trait::async_trait;
use backend::{DashboardEvent, DashboardService, HttpOutcall};
use common::{DashboardError, DashboardResult, NetworkError};
use domain::{
    Bill, Call, DomainError, Habit, HorseBet, HttpHeader, HttpResponsePayload, NnsState, Payment, Plan,
    Principal, Task, TaskPriority, UserProfile, UserRole,
};
use serde_json::json;
use std::sync::Arc;
use store::DashboardStore;
use tempfile::TempDir;

/// Outcall, отвечающий заранее заданным ответом
struct StubOutcall {
    response: HttpResponsePayload,
}

#[async_trait]
impl HttpOutcall for StubOutcall {
    async fn get(&self, url: &str) -> DashboardResult<HttpResponsePayload> {
        if url.contains("unreachable") {
            return Err(NetworkError::ConnectionRefused(url.to_string()).into());
        }
        Ok(self.response.clone())
    }
}

fn stub_outcall() -> Arc<dyn HttpOutcall> {
    Arc::new(StubOutcall {
        response: HttpResponsePayload {
            status: 200,
            headers: vec![HttpHeader {
                name: "set-cookie".to_string(),
                value: "secret".to_string(),
            }],
            body: br#"{"staked": 42}"#.to_vec(),
        },
    })
}

async fn create_service() -> (TempDir, DashboardService) {
    create_service_with_pool(2).await
}

async fn create_service_with_pool(pool_size: u32) -> (TempDir, DashboardService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = DashboardStore::new(temp_dir.path().join("test.db"), pool_size)
        .await
        .expect("Store should open");
    (temp_dir, DashboardService::new(store, stub_outcall(), 16))
}

fn admin() -> Principal {
    Principal::new("admin-principal")
}

fn user() -> Principal {
    Principal::new("user-principal")
}

#[tokio::test]
async fn test_roles_first_caller_is_admin() {
    let (_dir, service) = create_service().await;

    assert_eq!(
        service.get_caller_user_role(&admin()).await.unwrap(),
        UserRole::Admin
    );
    assert_eq!(
        service.get_caller_user_role(&user()).await.unwrap(),
        UserRole::User
    );
    assert_eq!(
        service
            .get_caller_user_role(&Principal::anonymous())
            .await
            .unwrap(),
        UserRole::Guest
    );
    assert!(service.is_caller_admin(&admin()).await.unwrap());
    assert!(!service.is_caller_admin(&user()).await.unwrap());
}

#[tokio::test]
async fn test_guest_cannot_use_user_operations() {
    let (_dir, service) = create_service().await;
    let guest = Principal::anonymous();

    let err = service.get_bills(&guest).await.unwrap_err();
    assert!(matches!(err, DashboardError::Unauthorized(_)));

    let err = service
        .add_task(&guest, Task::new("x", "", "y", TaskPriority::Low))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_assign_role_requires_admin() {
    let (_dir, service) = create_service().await;
    service.get_caller_user_role(&admin()).await.unwrap();
    service.get_caller_user_role(&user()).await.unwrap();

    let err = service
        .assign_caller_user_role(&user(), &admin(), UserRole::Guest)
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Unauthorized(_)));

    service
        .assign_caller_user_role(&admin(), &user(), UserRole::Guest)
        .await
        .unwrap();
    assert!(service.get_bills(&user()).await.is_err());

    assert!(service
        .assign_caller_user_role(&admin(), &Principal::anonymous(), UserRole::User)
        .await
        .is_err());
}

#[tokio::test]
async fn test_profiles_visibility() {
    let (_dir, service) = create_service().await;
    let profile = UserProfile {
        name: "Admin".to_string(),
        email: None,
    };
    service
        .save_caller_user_profile(&admin(), profile.clone())
        .await
        .unwrap();
    service
        .save_caller_user_profile(
            &user(),
            UserProfile {
                name: "User".to_string(),
                email: Some("u@example.org".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        service.get_caller_user_profile(&admin()).await.unwrap(),
        Some(profile.clone())
    );
    // Админ видит чужие профили, пользователь нет
    assert!(service.get_user_profile(&admin(), &user()).await.unwrap().is_some());
    assert!(service.get_user_profile(&user(), &admin()).await.is_err());
    assert!(service.get_user_profile(&user(), &user()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_bill_lifecycle() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    let mut draft = Bill::new("Rent", 1000.0, "March");
    draft.remaining_balance = 1.0;
    draft.is_paid = true;
    let bill = service.add_bill(&owner, draft).await.unwrap();
    assert_eq!(bill.id, 1);
    assert_eq!(bill.remaining_balance, 1000.0);
    assert!(!bill.is_paid);
    assert!(bill.created_at > 0);

    let payment = service
        .add_payment(
            &owner,
            Payment {
                id: 0,
                bill_id: bill.id,
                amount: 400.0,
                timestamp: 0,
            },
        )
        .await
        .unwrap();
    assert_eq!(payment.id, 1);

    let summary = service.get_bill_summary(&owner).await.unwrap();
    assert_eq!(summary.total_paid, 400.0);
    assert_eq!(summary.total_remaining, 600.0);

    // Сумма больше остатка отклоняется бизнес-правилом
    let err = service
        .add_payment(
            &owner,
            Payment {
                id: 0,
                bill_id: bill.id,
                amount: 600.01,
                timestamp: 0,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_client_error());

    // Редактирование сохраняет уже выплаченное
    let edited = service
        .edit_bill(&owner, bill.id, Bill::new("Rent", 1200.0, "April"))
        .await
        .unwrap();
    assert_eq!(edited.remaining_balance, 800.0);
    assert_eq!(edited.created_at, bill.created_at);

    // Кэш сводки сброшен после редактирования
    let summary = service.get_bill_summary(&owner).await.unwrap();
    assert_eq!(summary.total_owed, 1200.0);
    assert_eq!(summary.num_unpaid, 1);

    assert_eq!(
        service.get_bill_payments(&owner, bill.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    assert!(matches!(
        service.get_bill_payments(&owner, 9).await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        service.edit_bill(&owner, 9, Bill::new("x", 1.0, "")).await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        service.complete_task(&owner, 9).await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        service.update_habit_progress(&owner, 9, 1).await,
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_plan(&owner, 9).await,
        Err(DashboardError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let (_dir, service) = create_service().await;
    service
        .add_bill(&admin(), Bill::new("Secret", 10.0, ""))
        .await
        .unwrap();

    assert!(service.get_bills(&user()).await.unwrap().is_empty());
    assert!(service.get_bill_payments(&user(), 1).await.is_err());
}

#[tokio::test]
async fn test_bet_stats_cache_invalidation() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    assert_eq!(service.get_bet_stats(&owner).await.unwrap().total_bets, 0);

    let bet = HorseBet {
        id: 0,
        horse_name: "Shergar".to_string(),
        amount: 20.0,
        odds: 2.5,
        is_win: true,
        timestamp: 0,
    };
    service.add_horse_bet(&owner, bet).await.unwrap();

    let stats = service.get_bet_stats(&owner).await.unwrap();
    assert_eq!(stats.total_bets, 1);
    assert_eq!(stats.profit_loss, 30.0);
}

#[tokio::test]
async fn test_task_completion_is_idempotent() {
    let (_dir, service) = create_service().await;
    let owner = admin();
    let mut events = service.subscribe();

    let task = service
        .add_task(&owner, Task::new("Write report", "", "Work", TaskPriority::High))
        .await
        .unwrap();
    assert!(service.complete_task(&owner, task.id).await.unwrap().is_complete);
    assert!(service.complete_task(&owner, task.id).await.unwrap().is_complete);

    let mut completions = 0;
    while let Some(event) = events.try_next() {
        if matches!(event, DashboardEvent::TaskCompleted { .. }) {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
}

#[tokio::test]
async fn test_habit_progress_and_streak() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    let mut draft = Habit::new("Pushups", 2);
    draft.progress = 10;
    draft.streak = 5;
    let habit = service.add_habit(&owner, draft).await.unwrap();
    assert_eq!((habit.progress, habit.streak), (0, 0));

    let habit = service.update_habit_progress(&owner, habit.id, 1).await.unwrap();
    assert!(!habit.is_goal_reached());
    let habit = service.update_habit_progress(&owner, habit.id, 2).await.unwrap();
    assert!(habit.is_goal_reached());
    assert_eq!(habit.streak, 1);
}

#[tokio::test]
async fn test_plan_links_normalized() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    let mut draft = Plan::new("  Japan trip ");
    draft.links = vec!["jr-pass.example".to_string()];
    let plan = service.add_plan(&owner, draft).await.unwrap();
    assert_eq!(plan.title, "Japan trip");
    assert_eq!(plan.links, vec!["https://jr-pass.example".to_string()]);

    let mut updated = plan.clone();
    updated.notes = "Book flights".to_string();
    updated.links.push("http://hotel.example".to_string());
    let saved = service.update_plan(&owner, plan.id, updated).await.unwrap();
    assert_eq!(saved.links.len(), 2);
    assert_eq!(saved.notes, "Book flights");

    service.delete_plan(&owner, plan.id).await.unwrap();
    assert!(service.get_plans(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_nns_defaults_and_updates() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    let full = service.get_full_nns_data(&owner).await.unwrap();
    assert_eq!(full.nns_state.staked_icp, 0.0);
    assert_eq!(full.maturity.earned, 0.0);

    let state = service
        .update_nns_state(
            &owner,
            NnsState {
                staked_icp: 150.5,
                last_updated: 0,
            },
        )
        .await
        .unwrap();
    assert!(state.last_updated > 0);
    assert_eq!(service.get_nns_state(&owner).await.unwrap(), state);

    assert!(service
        .update_nns_state(
            &owner,
            NnsState {
                staked_icp: -1.0,
                last_updated: 0
            }
        )
        .await
        .is_err());
}

#[tokio::test]
async fn test_fetch_live_data_uses_transformed_body() {
    let (_dir, service) = create_service().await;

    let body = service
        .fetch_nns_live_data(&admin(), "https://nns.example/api")
        .await
        .unwrap();
    assert_eq!(body, r#"{"staked": 42}"#);

    let err = service
        .fetch_nns_live_data(&admin(), "https://unreachable.example")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NET_ERROR");
}

#[tokio::test]
async fn test_dispatch_json_calls() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    let call: Call = serde_json::from_value(json!({
        "method": "addBill",
        "args": {"bill": {
            "id": 0, "title": "Phone", "description": "", "totalAmount": 30.0,
            "remainingBalance": 30.0, "isPaid": false, "createdAt": 0
        }}
    }))
    .unwrap();
    let value = service.dispatch(&owner, call).await.unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["totalAmount"], 30.0);

    let role = service.dispatch(&owner, Call::GetCallerUserRole).await.unwrap();
    assert_eq!(role, json!("admin"));

    let value = service
        .dispatch(&owner, Call::GetBillSummary)
        .await
        .unwrap();
    assert_eq!(value["numBills"], 1);

    let err = service
        .dispatch(&owner, Call::DeletePlan { plan_id: 5 })
        .await
        .unwrap_err();
    assert_eq!(err.to_wire().code, "NOT_FOUND");
}

#[tokio::test]
async fn test_events_before_subscribe_are_not_kept() {
    let (_dir, service) = create_service().await;
    let owner = admin();

    for i in 0..20 {
        service
            .add_task(&owner, Task::new(format!("Task {i}"), "", "Work", TaskPriority::Low))
            .await
            .unwrap();
    }

    let mut events = service.subscribe();
    assert!(events.try_next().is_none());

    service
        .add_plan(&owner, Plan::new("Trip"))
        .await
        .unwrap();
    assert!(matches!(
        events.try_next(),
        Some(DashboardEvent::PlanAdded { plan_id: 1, .. })
    ));
    assert!(events.try_next().is_none());
}

#[tokio::test]
async fn test_every_subscriber_gets_each_event() {
    let (_dir, service) = create_service().await;
    let owner = admin();
    let mut first = service.subscribe();
    let mut second = service.subscribe();

    service.add_habit(&owner, Habit::new("Read", 3)).await.unwrap();

    for events in [&mut first, &mut second] {
        let mut habits_added = 0;
        while let Some(event) = events.try_next() {
            if matches!(event, DashboardEvent::HabitAdded { .. }) {
                habits_added += 1;
            }
        }
        assert_eq!(habits_added, 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_never_overpay() {
    let (_dir, service) = create_service_with_pool(8).await;
    let service = Arc::new(service);
    let owner = admin();

    let bill = service
        .add_bill(&owner, Bill::new("Loan", 100.0, ""))
        .await
        .unwrap();
    let bill_id = bill.id;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            service
                .add_payment(
                    &owner,
                    Payment {
                        id: 0,
                        bill_id,
                        amount: 10.0,
                        timestamp: 0,
                    },
                )
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

    let payments = service.get_bill_payments(&owner, bill_id).await.unwrap();
    let paid: f64 = payments.iter().map(|p| p.amount).sum();
    let bill = service.get_bills(&owner).await.unwrap().remove(0);
    assert_eq!(payments.len(), 10);
    assert_eq!(paid, bill.total_amount - bill.remaining_balance);
    assert_eq!(bill.remaining_balance, 0.0);
    assert!(bill.is_paid);

    let summary = service.get_bill_summary(&owner).await.unwrap();
    assert_eq!(summary.total_paid, 100.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_edit_racing_payments_keeps_paid_amount() {
    let (_dir, service) = create_service_with_pool(8).await;
    let service = Arc::new(service);
    let owner = admin();

    let bill = service
        .add_bill(&owner, Bill::new("Car", 1000.0, ""))
        .await
        .unwrap();
    let bill_id = bill.id;

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = Arc::clone(&service);
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                service
                    .edit_bill(&owner, bill_id, Bill::new("Car", 2000.0, "refinanced"))
                    .await
                    .map(|_| ())
            } else {
                service
                    .add_payment(
                        &owner,
                        Payment {
                            id: 0,
                            bill_id,
                            amount: 50.0,
                            timestamp: 0,
                        },
                    )
                    .await
                    .map(|_| ())
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let bill = service.get_bills(&owner).await.unwrap().remove(0);
    assert_eq!(bill.total_amount, 2000.0);
    assert_eq!(bill.remaining_balance, 2000.0 - 4.0 * 50.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_get_distinct_ids() {
    let (_dir, service) = create_service_with_pool(8).await;
    let service = Arc::new(service);
    let owner = admin();
    service.get_caller_user_role(&owner).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..24 {
        let service = Arc::clone(&service);
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            service
                .add_task(&owner, Task::new(format!("Task {i}"), "", "Work", TaskPriority::Medium))
                .await
                .map(|task| task.id)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=24).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_completion_emits_one_event() {
    let (_dir, service) = create_service_with_pool(8).await;
    let service = Arc::new(service);
    let owner = admin();

    let task = service
        .add_task(&owner, Task::new("Deploy", "", "Work", TaskPriority::High))
        .await
        .unwrap();
    let task_id = task.id;
    let mut events = service.subscribe();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            service.complete_task(&owner, task_id).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_complete);
    }

    let mut completions = 0;
    while let Some(event) = events.try_next() {
        if matches!(event, DashboardEvent::TaskCompleted { .. }) {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
}
