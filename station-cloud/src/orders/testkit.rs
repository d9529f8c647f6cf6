//! Seeded in-memory fixture for order tests

use std::sync::Arc;

use shared::models::{Citizen, Order, OrderCreate, OrderType, Role, User};

use crate::auth::Identity;
use crate::config::Config;
use crate::db::MemoryStore;
use crate::payment::scripted::ScriptedGateway;
use crate::state::AppState;

pub const STATION: &str = "s-1";
pub const OTHER_STATION: &str = "s-2";

pub const REGISTRAR: &str = "u-registrar";
pub const ADMIN: &str = "u-admin";
pub const PRINTER: &str = "u-printer";
pub const SUPER_ADMIN: &str = "u-super";
pub const SUPER_PRINTER: &str = "u-super-printer";
pub const OTHER_REGISTRAR: &str = "u-other";

pub const CITIZEN: &str = "c-1";
pub const UNVERIFIED_CITIZEN: &str = "c-2";
pub const OTHER_CITIZEN: &str = "c-3";

pub struct Fixture {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<ScriptedGateway>,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(ScriptedGateway::happy(300));

        for (id, role, station) in [
            (REGISTRAR, Role::StationRegistrar, Some(STATION)),
            (ADMIN, Role::StationAdmin, Some(STATION)),
            (PRINTER, Role::StationPrinter, Some(STATION)),
            (SUPER_ADMIN, Role::SuperAdmin, None),
            (SUPER_PRINTER, Role::SuperPrinter, None),
            (OTHER_REGISTRAR, Role::StationRegistrar, Some(OTHER_STATION)),
        ] {
            store
                .add_user(User {
                    id: id.to_string(),
                    username: id.trim_start_matches("u-").to_string(),
                    role,
                    station_id: station.map(str::to_string),
                })
                .await;
        }

        for (id, station, verified) in [
            (CITIZEN, STATION, true),
            (UNVERIFIED_CITIZEN, STATION, false),
            (OTHER_CITIZEN, OTHER_STATION, true),
        ] {
            store
                .add_citizen(Citizen {
                    id: id.to_string(),
                    station_id: station.to_string(),
                    first_name: "Abebe".to_string(),
                    last_name: "Kebede".to_string(),
                    phone_number: "0911000000".to_string(),
                    is_verified: verified,
                })
                .await;
        }

        let state = AppState::from_parts(store.clone(), gateway.clone(), &Config::for_tests());
        Self {
            state,
            store,
            gateway,
        }
    }

    /// A freshly created NORMAL order of [`CITIZEN`] at [`STATION`]
    pub async fn pending_order(&self) -> Order {
        crate::orders::create_order(
            &self.state,
            &identity(REGISTRAR),
            OrderCreate {
                citizen_id: CITIZEN.to_string(),
                order_type: OrderType::Normal,
                amount: None,
            },
        )
        .await
        .expect("fixture order")
    }
}

/// Token identity; the stored user row decides the effective role
pub fn identity(user_id: &str) -> Identity {
    Identity {
        user_id: user_id.to_string(),
        role: Role::StationRegistrar,
    }
}
