// src/services/lifecycle.rs
//
// Tabela de transições do ciclo de vida do aparelho. Todas as regras de
// mudança de status passam por aqui.

use crate::{common::error::AppError, models::device::DeviceStatus};

/// Quem está pedindo a movimentação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementSource {
    /// Movimentação avulsa (tela de movimentações, importação, chat)
    Manual,
    /// Devolução com checklist
    Return,
    /// Fechamento de O.S.
    MaintenanceClose,
}

/// O que fazer com o responsável na nova entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderRule {
    Required,
    CarryForward,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub holder: HolderRule,
    pub opens_order: bool,
    pub closes_order: bool,
}

impl Transition {
    const fn new(holder: HolderRule) -> Self {
        Self { holder, opens_order: false, closes_order: false }
    }

    const fn opening_order(self) -> Self {
        Self { opens_order: true, ..self }
    }

    const fn closing_order(self) -> Self {
        Self { closes_order: true, ..self }
    }
}

pub fn transition(
    from: DeviceStatus,
    to: DeviceStatus,
    source: MovementSource,
) -> Result<Transition, AppError> {
    use DeviceStatus::*;
    use HolderRule::*;

    let rule = match (from, to) {
        // Baixado é terminal
        (Decommissioned, _) => None,

        // Sai da manutenção só fechando a O.S. (direto ou pela devolução)
        (InMaintenance, InStock | Decommissioned) => match source {
            MovementSource::MaintenanceClose | MovementSource::Return => {
                Some(Transition::new(Clear).closing_order())
            }
            MovementSource::Manual => None,
        },
        (InMaintenance, _) => None,

        (InStock | InUse, InMaintenance) => Some(Transition::new(CarryForward).opening_order()),
        (InStock | InUse, InUse) => Some(Transition::new(Required)),
        (InStock | InUse, InStock | Decommissioned) => Some(Transition::new(Clear)),
    };

    // O fechamento de O.S. nunca parte de outro status
    let rule = match (source, from) {
        (MovementSource::MaintenanceClose, InStock | InUse) => None,
        _ => rule,
    };

    rule.ok_or(AppError::InvalidTransition { from, to })
}

/// Status aceitos na entrada de um aparelho novo.
pub fn check_intake(status: DeviceStatus) -> Result<(), AppError> {
    match status {
        DeviceStatus::InStock | DeviceStatus::Decommissioned => Ok(()),
        other => Err(AppError::InvalidInput(format!(
            "um aparelho novo não pode entrar como '{}'",
            other
        ))),
    }
}

/// Resolve o responsável da nova entrada segundo a regra da transição.
/// `carried` é o último responsável conhecido no histórico.
pub fn resolve_holder(
    transition: &Transition,
    to: DeviceStatus,
    supplied: Option<i64>,
    carried: Option<i64>,
) -> Result<Option<i64>, AppError> {
    match transition.holder {
        HolderRule::Required => supplied.map(Some).ok_or_else(|| {
            AppError::InvalidInput(format!("colaborador é obrigatório para o status '{}'", to))
        }),
        HolderRule::CarryForward => Ok(supplied.or(carried)),
        HolderRule::Clear => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeviceStatus::*;

    #[test]
    fn decommissioned_is_terminal() {
        for to in DeviceStatus::ALL {
            for source in [MovementSource::Manual, MovementSource::Return, MovementSource::MaintenanceClose] {
                assert!(transition(Decommissioned, to, source).is_err(), "{to} via {source:?}");
            }
        }
    }

    #[test]
    fn double_maintenance_is_rejected() {
        let err = transition(InMaintenance, InMaintenance, MovementSource::Manual).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { from: InMaintenance, to: InMaintenance }));
        assert!(transition(InMaintenance, InMaintenance, MovementSource::Return).is_err());
    }

    #[test]
    fn leaving_maintenance_requires_closing_the_order() {
        assert!(transition(InMaintenance, InStock, MovementSource::Manual).is_err());
        assert!(transition(InMaintenance, InUse, MovementSource::Manual).is_err());

        let t = transition(InMaintenance, InStock, MovementSource::MaintenanceClose).unwrap();
        assert!(t.closes_order);
        assert_eq!(t.holder, HolderRule::Clear);

        let t = transition(InMaintenance, Decommissioned, MovementSource::Return).unwrap();
        assert!(t.closes_order);
    }

    #[test]
    fn entering_maintenance_carries_holder_and_opens_order() {
        let t = transition(InUse, InMaintenance, MovementSource::Manual).unwrap();
        assert_eq!(t.holder, HolderRule::CarryForward);
        assert!(t.opens_order);
        assert!(!t.closes_order);
    }

    #[test]
    fn maintenance_close_only_from_maintenance() {
        assert!(transition(InUse, InStock, MovementSource::MaintenanceClose).is_err());
        assert!(transition(InStock, Decommissioned, MovementSource::MaintenanceClose).is_err());
    }

    #[test]
    fn in_use_requires_holder() {
        let t = transition(InStock, InUse, MovementSource::Manual).unwrap();
        assert!(resolve_holder(&t, InUse, None, Some(3)).is_err());
        assert_eq!(resolve_holder(&t, InUse, Some(9), None).unwrap(), Some(9));
    }

    #[test]
    fn transfer_between_employees_is_allowed() {
        let t = transition(InUse, InUse, MovementSource::Manual).unwrap();
        assert_eq!(t.holder, HolderRule::Required);
    }

    #[test]
    fn stock_and_decommission_clear_holder() {
        let t = transition(InUse, InStock, MovementSource::Manual).unwrap();
        assert_eq!(resolve_holder(&t, InStock, Some(42), Some(42)).unwrap(), None);
        let t = transition(InUse, Decommissioned, MovementSource::Manual).unwrap();
        assert_eq!(resolve_holder(&t, Decommissioned, None, Some(42)).unwrap(), None);
    }

    #[test]
    fn carry_forward_prefers_supplied_then_history() {
        let t = transition(InUse, InMaintenance, MovementSource::Manual).unwrap();
        assert_eq!(resolve_holder(&t, InMaintenance, None, Some(42)).unwrap(), Some(42));
        assert_eq!(resolve_holder(&t, InMaintenance, Some(7), Some(42)).unwrap(), Some(7));
        assert_eq!(resolve_holder(&t, InMaintenance, None, None).unwrap(), None);
    }

    #[test]
    fn intake_accepts_stock_and_decommissioned_only() {
        assert!(check_intake(InStock).is_ok());
        assert!(check_intake(Decommissioned).is_ok());
        assert!(check_intake(InUse).is_err());
        assert!(check_intake(InMaintenance).is_err());
    }
}
