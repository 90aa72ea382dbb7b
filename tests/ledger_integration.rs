//! Ciclo de vida dos aparelhos contra um PostgreSQL real.
//!
//! Run with: TEST_DATABASE_URL=postgres://... cargo test --test ledger_integration -- --ignored

mod common;

use assetflow::{
    common::error::{AppError, ErrorKind},
    models::{
        device::DeviceStatus,
        ledger::{ReturnDevicePayload, STOCK_LOCATION},
        maintenance::MaintenanceStatus,
    },
};
use common::{create_test_pool, return_checklist, seed_device, seed_employee, seed_model, test_state};
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_handover_sets_holder_and_location() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    let initial = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(initial.status, DeviceStatus::InStock);
    assert_eq!(initial.holder_id, None);

    state
        .ledger_service
        .record_movement(
            &state.db_pool,
            device.id,
            DeviceStatus::InUse,
            Some(employee.id),
            Some("Desk 3"),
            Some("handover"),
        )
        .await
        .unwrap();

    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InUse);
    assert_eq!(current.holder_id, Some(employee.id));
    assert_eq!(current.location.as_deref(), Some("Desk 3"));

    // Leitura repetida não muda nada
    let again = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(again, current);

    let cached = state.device_service.get_device(device.id).await.unwrap();
    assert_eq!(cached.status, DeviceStatus::InUse);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_maintenance_carries_holder_and_round_trips() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), Some("Desk 3"), None)
        .await
        .unwrap();

    let order = state
        .maintenance_service
        .open_order(&state.db_pool, device.id, "Vendor X", "cracked screen")
        .await
        .unwrap();
    assert_eq!(order.status, MaintenanceStatus::InProgress);
    assert_eq!(order.employee_id_at_send, Some(employee.id));

    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InMaintenance);
    assert_eq!(current.holder_id, Some(employee.id));

    // Segunda O.S. para o mesmo aparelho é recusada
    let err = state
        .maintenance_service
        .open_order(&state.db_pool, device.id, "Vendor Y", "again")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    // Não sai da manutenção por movimentação avulsa
    let err = state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InStock, None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let closed = state
        .maintenance_service
        .close_order(&state.db_pool, order.id, Some("troca de tela"), Decimal::new(25_000, 2), DeviceStatus::InStock)
        .await
        .unwrap();
    assert_eq!(closed.status, MaintenanceStatus::Completed);
    assert!(closed.returned_on.is_some());

    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InStock);
    assert_eq!(current.holder_id, None);
    assert_eq!(current.location.as_deref(), Some(STOCK_LOCATION));

    let history = state.ledger_service.device_history(&state.db_pool, device.id).await.unwrap();
    assert_eq!(history.len(), 4);
    assert!(history[0].notes.as_deref().unwrap_or_default().contains("R$250.00"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_return_to_stock_clears_holder() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let other = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), None, None)
        .await
        .unwrap();

    let payload = |employee_id: i64| -> ReturnDevicePayload {
        serde_json::from_value(json!({
            "employeeId": employee_id,
            "checklist": return_checklist(),
            "destination": "returnToStock",
            "notes": "sem avarias"
        }))
        .unwrap()
    };

    // Quem devolve precisa ser o responsável atual
    let err = state
        .ledger_service
        .return_device(&state.db_pool, device.id, &payload(other.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DeviceNotHeldBy { .. }));

    let outcome = state
        .ledger_service
        .return_device(&state.db_pool, device.id, &payload(employee.id))
        .await
        .unwrap();
    assert_eq!(outcome.entry.status, DeviceStatus::InStock);
    assert!(outcome.entry.checklist.is_some());

    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InStock);
    assert_eq!(current.holder_id, None);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_return_from_maintenance_closes_open_order() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), None, None)
        .await
        .unwrap();
    let order = state
        .maintenance_service
        .open_order(&state.db_pool, device.id, "Vendor X", "bateria estufada")
        .await
        .unwrap();

    // Em manutenção o responsável continua o mesmo
    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InMaintenance);
    assert_eq!(current.holder_id, Some(employee.id));

    let payload: ReturnDevicePayload = serde_json::from_value(json!({
        "employeeId": employee.id,
        "checklist": return_checklist(),
        "destination": "returnToStock"
    }))
    .unwrap();
    let outcome = state.ledger_service.return_device(&state.db_pool, device.id, &payload).await.unwrap();

    let closed = outcome.closed_order.expect("open order should be closed by the return");
    assert_eq!(closed.id, order.id);
    assert_eq!(closed.status, MaintenanceStatus::Completed);
    assert!(closed.returned_on.is_some());

    let orders = state.maintenance_service.list_for_device(device.id).await.unwrap();
    assert!(orders.iter().all(|o| o.status != MaintenanceStatus::InProgress));

    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InStock);
    assert_eq!(current.holder_id, None);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_overlapping_transactions_keep_ledger_order() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    // Transação aberta antes, mas que só pega o lock do aparelho depois
    let mut slow = state.db_pool.begin().await.unwrap();
    sqlx::query("SELECT 1").execute(&mut *slow).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), None, None)
        .await
        .unwrap();

    state
        .ledger_service
        .record_movement(&mut *slow, device.id, DeviceStatus::InStock, None, None, Some("devolvido"))
        .await
        .unwrap();
    slow.commit().await.unwrap();

    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    let cached = state.device_service.get_device(device.id).await.unwrap();
    assert_eq!(current.status, DeviceStatus::InStock);
    assert_eq!(cached.status, current.status);
    assert_eq!(current.holder_id, None);

    let history = state.ledger_service.device_history(&state.db_pool, device.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].status, DeviceStatus::InStock);
    assert!(history[0].moved_at > history[1].moved_at);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_employee_with_history_cannot_be_deleted() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), None, None)
        .await
        .unwrap();

    let err = state.employee_service.delete_employee(&state.db_pool, employee.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialSafety);

    let still_there = state.employee_service.get_employee(&state.db_pool, employee.id).await.unwrap();
    assert_eq!(still_there.id, employee.id);

    // Sem histórico, a exclusão passa
    let unused = seed_employee(&state).await;
    state.employee_service.delete_employee(&state.db_pool, unused.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_device_with_history_cannot_be_deleted() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let device = seed_device(&state, model.id).await;

    // A entrada de cadastro já conta como referência
    let err = state.device_service.delete_device(&state.db_pool, device.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialSafety);
    assert!(matches!(err, AppError::ReferencedByHistory { references, .. } if references >= 1));

    let still_there = state.device_service.get_device(device.id).await.unwrap();
    assert_eq!(still_there.serial_number, device.serial_number);
    let history = state.ledger_service.device_history(&state.db_pool, device.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_history_is_append_only() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let device = seed_device(&state, model.id).await;

    let update = sqlx::query("UPDATE movement_history SET notes = 'x' WHERE device_id = $1")
        .bind(device.id)
        .execute(&state.db_pool)
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM movement_history WHERE device_id = $1")
        .bind(device.id)
        .execute(&state.db_pool)
        .await;
    assert!(delete.is_err());

    let history = state.ledger_service.device_history(&state.db_pool, device.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_decommissioned_device_is_terminal() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;

    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::Decommissioned, None, None, None)
        .await
        .unwrap();

    let err = state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition { from: DeviceStatus::Decommissioned, to: DeviceStatus::InUse }
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_import_reports_failing_rows_without_rollback() {
    let state = test_state(create_test_pool().await);
    let duplicated_cpf = common::unique_cpf();

    let rows: Vec<_> = (0..10)
        .map(|i| {
            // A linha 5 repete o CPF da linha 1
            let cpf = if i == 0 || i == 4 { duplicated_cpf.clone() } else { common::unique_cpf() };
            json!({
                "codigo": common::unique("IMP"),
                "nome_completo": format!("Importado {}", i),
                "cpf": cpf,
            })
        })
        .collect();

    let report = state.import_service.import_employees(rows).await;
    assert_eq!(report.succeeded, 9);
    assert_eq!(report.failed, 1);
    assert_eq!(report.errors[0].row, 6);
    assert_eq!(report.errors[0].kind, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_failed_restore_leaves_database_untouched() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    let employee = seed_employee(&state).await;
    let device = seed_device(&state, model.id).await;
    state
        .ledger_service
        .record_movement(&state.db_pool, device.id, DeviceStatus::InUse, Some(employee.id), None, None)
        .await
        .unwrap();

    let err = state.backup_service.restore("   ").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    // O script quebra depois de recriar o esquema e parte dos dados
    let mut script = state.backup_service.create_backup().await.unwrap();
    script.push_str("\nINSERT INTO tabela_inexistente VALUES (1);\n");

    let err = state.backup_service.restore(&script).await.unwrap_err();
    assert!(matches!(err, AppError::RestoreFailed(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let still_there = state.device_service.get_device(device.id).await.unwrap();
    assert_eq!(still_there.status, DeviceStatus::InUse);
    let current = state.ledger_service.get_current_state(&state.db_pool, device.id).await.unwrap();
    assert_eq!(current.holder_id, Some(employee.id));
    let history = state.ledger_service.device_history(&state.db_pool, device.id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_dashboard_summary_counts_every_status() {
    let state = test_state(create_test_pool().await);
    let model = seed_model(&state).await;
    seed_device(&state, model.id).await;

    let summary = state.dashboard_service.get_summary().await.unwrap();
    assert!(summary.total_devices >= 1);
    assert_eq!(summary.devices_by_status.len(), 4);
    let by_status: i64 = summary.devices_by_status.iter().map(|s| s.total).sum();
    assert_eq!(by_status, summary.total_devices);
}
