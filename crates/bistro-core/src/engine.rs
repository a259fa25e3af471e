//! Game engine - owns one restaurant session
//!
//! [`GameEngine`] is the aggregate of everything a session mutates: the
//! customer world, tables, player, oven, ledger and the timer scheduler.
//! Hosts drive it with [`GameEngine::update`] once per frame and read back
//! [`UiEvent`]s, the HUD and the order summary.

use std::io::{Read, Write};

use bistro_logic::config::GameConfig;
use bistro_logic::constants::movement::{OUTSIDE_TOP_MARGIN, PLAYER_SIZE};
use bistro_logic::economy::{Ledger, UpgradeKind, UpgradeOffer};
use bistro_logic::geometry::{Point, Rect};
use bistro_logic::grid::OccupancyGrid;
use bistro_logic::interaction::{resolve_target, InteractTarget};
use bistro_logic::layout::RestaurantLayout;
use bistro_logic::orders::{Dish, Holding, OrderError, OrderPhase, OrderTicket};
use bistro_logic::pathfinding::find_path;
use bistro_logic::status::Status;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::*;
use crate::persistence::{
    SaveError, SaveStore, SerializableCustomer, SessionData, SlotData, SAVE_VERSION,
};
use crate::scheduler::{Guard, Scheduler, Task};
use crate::systems::*;

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Init,
    Running,
    Stopped,
}

/// Why a customer left their table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveCause {
    Served { reward: u64 },
    Expired,
}

impl LeaveCause {
    /// Floating text shown over the table.
    pub fn indicator(&self) -> String {
        match self {
            LeaveCause::Served { reward } => format!("+${}", reward),
            LeaveCause::Expired => "Left".to_string(),
        }
    }
}

/// Notifications for the host UI, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Status(Status),
    FloatingText { table: usize, text: String },
    FridgeOpened,
    Saved,
    DoorToggled { open: bool },
}

/// One row of the orders panel.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub table: usize,
    pub dish: Dish,
    pub taken: bool,
    /// Remaining patience, 0..=1.
    pub patience: f32,
}

impl std::fmt::Display for OrderLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.taken { "Taken" } else { "Waiting" };
        write!(f, "Table {}: {} - {}", self.table + 1, self.dish, state)
    }
}

/// Read-only snapshot of what the HUD shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub money: u64,
    /// `Holding: ... | Ticket: ...`
    pub order_line: String,
    pub status: Option<String>,
    pub door_open: bool,
    pub cooking: Option<Dish>,
    pub ready: Vec<Dish>,
    pub orders: Vec<OrderLine>,
}

impl Hud {
    pub fn money_text(&self) -> String {
        format!("Money: ${}", self.money)
    }
}

/// Main session engine
pub struct GameEngine<S: SaveStore> {
    /// ECS world holding one customer entity per table
    pub world: World,
    config: GameConfig,
    layout: RestaurantLayout,
    grid: OccupancyGrid,
    walls: Vec<Rect>,
    tables: Vec<Table>,
    /// `table index → customer entity`
    seating: Vec<Entity>,
    player: Player,
    oven: Oven,
    door_open: bool,
    ledger: Ledger,
    scheduler: Scheduler,
    store: S,
    slot: String,
    rng: StdRng,
    events: Vec<UiEvent>,
    last_status: Option<Status>,
    next_token: u64,
    phase: EnginePhase,
}

impl<S: SaveStore> GameEngine<S> {
    /// Build the restaurant and its (hidden) customers. Progress is read
    /// from `slot` when the session starts.
    pub fn new(config: GameConfig, store: S, slot: impl Into<String>) -> Self {
        let layout = RestaurantLayout::new(config.world_width, config.world_height);
        let grid = layout.build_grid(config.cell_size);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut world = World::new();
        let mut tables = Vec::with_capacity(layout.table_count());
        let mut seating = Vec::with_capacity(layout.table_count());
        for (index, position) in layout.tables.iter().enumerate() {
            let seat = layout.seat(index).unwrap_or(*position);
            tables.push(Table::new(index, *position, seat));
            let entity = world.spawn((
                Customer::new(index),
                Position(layout.spawn),
                Facing(0.0),
                Tint::between(rng.gen()),
            ));
            seating.push(entity);
        }

        Self {
            world,
            player: Player::new(layout.player_start, 0),
            walls: layout.walls(),
            config,
            layout,
            grid,
            tables,
            seating,
            oven: Oven::default(),
            door_open: false,
            ledger: Ledger::default(),
            scheduler: Scheduler::new(),
            store,
            slot: slot.into(),
            rng,
            events: Vec::new(),
            last_status: None,
            next_token: 0,
            phase: EnginePhase::Init,
        }
    }

    /// Load progress and schedule arrivals and recurring timers.
    pub fn start(&mut self) {
        if self.phase != EnginePhase::Init {
            return;
        }
        self.ledger = match self.store.load(&self.slot) {
            Ok(Some(data)) => data.to_ledger(),
            Ok(None) => Ledger::default(),
            Err(e) => {
                log::warn!("Failed to load slot {}: {}; starting fresh", self.slot, e);
                Ledger::default()
            }
        };
        self.player.speed = self.ledger.player_speed();

        for table in 0..self.tables.len() {
            let delay = self.config.first_spawn_ms + self.config.spawn_stagger_ms * table as u64;
            self.scheduler
                .schedule(delay, Task::SpawnCustomer { table }, Guard::CustomerHidden { table });
        }
        self.scheduler
            .schedule(self.order_interval(), Task::OrderTick, Guard::Always);
        self.scheduler
            .schedule(self.autosave_interval(), Task::Autosave, Guard::Always);

        self.phase = EnginePhase::Running;
        log::info!(
            "Session started on slot {} with ${} and {} tables",
            self.slot,
            self.ledger.money(),
            self.tables.len()
        );
    }

    /// Save progress and drop every pending timer.
    pub fn shutdown(&mut self) {
        if self.phase == EnginePhase::Running {
            self.save_progress();
        }
        self.scheduler.clear();
        self.phase = EnginePhase::Stopped;
        log::info!("Session on slot {} stopped", self.slot);
    }

    /// Advance the session by `delta_ms`.
    ///
    /// Order of work: player movement and interaction, customer walks,
    /// patience and expiry, then every timer due within the frame.
    pub fn update(&mut self, delta_ms: u64, input: &FrameInput) {
        if self.phase != EnginePhase::Running {
            return;
        }
        let target = self.scheduler.now().saturating_add(delta_ms);

        let solids = self.solids();
        let bounds = self.player_bounds();
        player_movement_system(&mut self.player, input, &solids, bounds, delta_ms as f32);
        if input.interact {
            self.interact();
        }

        for table in customer_movement_system(&mut self.world, delta_ms as f32) {
            log::debug!("Customer seated at table {}", table + 1);
        }

        for expiry in patience_system(&mut self.tables, delta_ms) {
            log::debug!(
                "Table {} gave up waiting for {} (taken: {})",
                expiry.table + 1,
                expiry.dish,
                expiry.was_taken
            );
            self.leave(expiry.table, LeaveCause::Expired);
        }

        while let Some(timer) = self.scheduler.pop_due(target) {
            if self.guard_holds(timer.guard) {
                self.run_task(timer.task);
            }
        }
        self.scheduler.advance_to(target);
    }

    // ── Player actions ─────────────────────────────────────────────────

    /// Handle one interact press at the player's position.
    pub fn interact(&mut self) -> Option<InteractTarget> {
        let target = resolve_target(&self.layout, self.player.position, self.config.interact_radius)?;
        match target {
            InteractTarget::Door => {
                self.toggle_door();
            }
            InteractTarget::Fridge => self.open_fridge(),
            InteractTarget::Trash => {
                self.dispose();
            }
            InteractTarget::Kitchen => {
                self.kitchen_interact();
            }
            InteractTarget::Table(index) => {
                self.table_interact(index);
            }
        }
        Some(target)
    }

    /// Serve, take the order, or explain what is missing.
    pub fn table_interact(&mut self, table: usize) -> Status {
        let phase = match self.tables.get(table) {
            Some(t) => t.order.phase(),
            None => return self.report(Status::GetIngredientsFirst),
        };
        match (self.player.holding, phase) {
            (Holding::Food(_), OrderPhase::Posted | OrderPhase::Taken) => self.serve(table),
            (Holding::Empty, OrderPhase::Posted) => self.take_order(table),
            (_, OrderPhase::Posted) => self.report(Status::HandsFull),
            _ => self.report(Status::GetIngredientsFirst),
        }
    }

    /// Posted → Taken: hand the player this table's ticket. A ticket for
    /// another table is replaced.
    pub fn take_order(&mut self, table: usize) -> Status {
        if !self.player.holding.is_empty() {
            return self.report(Status::HandsFull);
        }
        let Some(t) = self.tables.get_mut(table) else {
            return self.report(Status::from(OrderError::NoOrder));
        };
        match t.order.take() {
            Ok(dish) => {
                if let Some(old) = self.player.ticket {
                    log::debug!("Ticket for table {} replaced", old.table + 1);
                }
                self.player.ticket = Some(OrderTicket { dish, table });
                self.report(Status::TookOrder(dish))
            }
            Err(e) => self.report(Status::from(e)),
        }
    }

    /// Taken → fulfilled: deliver the held food against the ticket.
    pub fn serve(&mut self, table: usize) -> Status {
        let Holding::Food(dish) = self.player.holding else {
            return self.report(Status::GetIngredientsFirst);
        };
        let Some(t) = self.tables.get_mut(table) else {
            return self.report(Status::from(OrderError::NoOrder));
        };
        match t.order.fulfill(table, dish, self.player.ticket.as_ref()) {
            Ok(dish) => {
                let reward = self.ledger.credit_serve();
                self.player.holding = Holding::Empty;
                self.player.ticket = None;
                log::debug!("Served {} at table {} for ${}", dish, table + 1, reward);
                let status = self.report(Status::Served { dish, reward });
                self.leave(table, LeaveCause::Served { reward });
                status
            }
            Err(e) => self.report(Status::from(e)),
        }
    }

    pub fn open_fridge(&mut self) {
        self.events.push(UiEvent::FridgeOpened);
    }

    /// Take a raw ingredient from the fridge. Whatever was held is dropped.
    pub fn grab_ingredient(&mut self, dish: Dish) -> Status {
        self.player.holding = Holding::RawIngredient(dish);
        self.report(Status::GotIngredient(dish))
    }

    /// Start cooking the held ingredient, or pick up a finished dish.
    pub fn kitchen_interact(&mut self) -> Status {
        match self.player.holding {
            Holding::RawIngredient(dish) => {
                if self.oven.is_busy() {
                    return self.report(Status::AlreadyCooking);
                }
                self.player.holding = Holding::Empty;
                self.start_cooking(dish)
            }
            Holding::Empty => {
                let near = self.player.position.distance(&self.layout.oven) < self.config.pickup_radius;
                let taken = if near { self.oven.take_from_counter() } else { None };
                match taken {
                    Some(dish) => {
                        self.player.holding = Holding::Food(dish);
                        self.report(Status::PickedUp(dish))
                    }
                    None => self.report(Status::KitchenArea),
                }
            }
            Holding::Food(_) => self.report(Status::KitchenArea),
        }
    }

    fn start_cooking(&mut self, dish: Dish) -> Status {
        self.oven.cooking = Some(dish);
        let duration = self.ledger.cook_duration_ms().round().max(0.0) as u64;
        self.scheduler
            .schedule(duration, Task::CookComplete { dish }, Guard::Always);
        log::debug!("Cooking {} for {} ms", dish, duration);
        self.report(Status::Cooking(dish))
    }

    /// Throw away whatever is held.
    pub fn dispose(&mut self) -> Status {
        match self.player.holding.item_name() {
            Some(name) => {
                self.player.holding = Holding::Empty;
                self.report(Status::Disposed(name))
            }
            None => self.report(Status::NothingToDispose),
        }
    }

    pub fn toggle_door(&mut self) -> Status {
        self.door_open = !self.door_open;
        self.events.push(UiEvent::DoorToggled {
            open: self.door_open,
        });
        if self.door_open {
            self.report(Status::DoorOpened)
        } else {
            self.report(Status::DoorClosed)
        }
    }

    /// Buy the next level of an upgrade. Progress is saved right away.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Status {
        match self.ledger.buy_upgrade(kind) {
            Ok(purchase) => {
                if kind == UpgradeKind::PlayerSpeed {
                    self.player.speed = self.ledger.player_speed();
                }
                log::info!(
                    "Bought {} level {} for ${}",
                    kind.name(),
                    purchase.new_level,
                    purchase.cost
                );
                self.save_progress();
                self.report(Status::BoughtUpgrade(kind))
            }
            Err(e) => {
                log::debug!("Purchase refused: {}", e);
                self.report(Status::from(e))
            }
        }
    }

    pub fn upgrade_offers(&self) -> Vec<UpgradeOffer> {
        self.ledger.offers()
    }

    // ── Order lifecycle ────────────────────────────────────────────────

    /// Post an order at a table directly. The periodic order pass does
    /// this at random for seated customers.
    pub fn post_order(&mut self, table: usize, dish: Dish, patience_ms: u64) -> Result<(), OrderError> {
        let t = self.tables.get_mut(table).ok_or(OrderError::NoOrder)?;
        t.order.post(dish, patience_ms)?;
        log::debug!("Table {} ordered {}", table + 1, dish);
        Ok(())
    }

    /// Send a table's customer away and schedule their return.
    ///
    /// Clears the order and any ticket for the table. Returns whether a
    /// respawn was scheduled: a customer that is already away keeps its
    /// single pending respawn.
    pub fn leave(&mut self, table: usize, cause: LeaveCause) -> bool {
        let Some(&entity) = self.seating.get(table) else {
            return false;
        };
        self.tables[table].order.clear();
        if self.player.invalidate_ticket(table) {
            log::debug!("Ticket for table {} invalidated", table + 1);
        }

        let token = self.next_token;
        let fresh = {
            let Ok(mut customer) = self.world.get::<&mut Customer>(entity) else {
                return false;
            };
            let already_away = !customer.visible && customer.pending_respawn.is_some();
            customer.visible = false;
            customer.waiting = false;
            if !already_away {
                customer.pending_respawn = Some(token);
            }
            !already_away
        };
        let _ = self.world.remove_one::<Walking>(entity);

        if !fresh || self.phase == EnginePhase::Stopped {
            return false;
        }
        self.next_token += 1;
        self.events.push(UiEvent::FloatingText {
            table,
            text: cause.indicator(),
        });

        let (lo, hi) = self.respawn_window();
        let delay = self.rng.gen_range(lo..=hi);
        self.scheduler.schedule(
            delay,
            Task::RespawnCustomer { table },
            Guard::RespawnPending { table, token },
        );
        log::debug!("Customer at table {} left; back in {} ms", table + 1, delay);
        true
    }

    /// Put a table's customer at the door and walk them to their seat.
    fn spawn_customer(&mut self, table: usize) {
        let Some(&entity) = self.seating.get(table) else {
            return;
        };
        let spawn = self.layout.spawn;
        let seat = self.tables[table].seat;
        let walking = match find_path(&self.grid, spawn, seat) {
            Some(path) if !path.is_empty() => {
                Some(Walking::new(spawn, &path, self.config.customer_speed, seat))
            }
            Some(_) => None,
            None => {
                log::warn!("No path to table {}; seating customer directly", table + 1);
                None
            }
        };

        if let Ok(mut customer) = self.world.get::<&mut Customer>(entity) {
            customer.visible = true;
            customer.waiting = walking.is_none();
            customer.pending_respawn = None;
        }
        if let Ok(mut pos) = self.world.get::<&mut Position>(entity) {
            pos.0 = if walking.is_some() { spawn } else { seat };
        }
        match walking {
            Some(w) => {
                if let (Some(deg), Ok(mut facing)) =
                    (w.motion.facing(), self.world.get::<&mut Facing>(entity))
                {
                    facing.0 = deg;
                }
                let _ = self.world.insert_one(entity, w);
            }
            None => {
                let _ = self.world.remove_one::<Walking>(entity);
            }
        }
    }

    // ── Timers ─────────────────────────────────────────────────────────

    fn guard_holds(&self, guard: Guard) -> bool {
        match guard {
            Guard::Always => true,
            Guard::CustomerHidden { table } => self
                .customer(table)
                .map(|c| !c.visible && c.pending_respawn.is_none())
                .unwrap_or(false),
            Guard::RespawnPending { table, token } => self
                .customer(table)
                .map(|c| !c.waiting && c.pending_respawn == Some(token))
                .unwrap_or(false),
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::SpawnCustomer { table } => self.spawn_customer(table),
            Task::RespawnCustomer { table } => {
                let tint = Tint::between(self.rng.gen());
                if let Some(&entity) = self.seating.get(table) {
                    if let Ok(mut t) = self.world.get::<&mut Tint>(entity) {
                        *t = tint;
                    }
                }
                self.tables[table].order.clear();
                log::debug!("Customer returning to table {}", table + 1);
                self.spawn_customer(table);
            }
            Task::CookComplete { .. } => {
                if let Some(dish) = self.oven.finish() {
                    self.report(Status::Cooked(dish));
                }
            }
            Task::OrderTick => {
                let roll = self.config.order_roll(self.ledger.patience_bonus_secs());
                let posted = order_generation_system(
                    &self.world,
                    &self.seating,
                    &mut self.tables,
                    &roll,
                    &mut self.rng,
                );
                for (table, dish) in posted {
                    log::debug!("Table {} ordered {}", table + 1, dish);
                }
                self.scheduler
                    .schedule(self.order_interval(), Task::OrderTick, Guard::Always);
            }
            Task::Autosave => {
                self.save_progress();
                self.scheduler
                    .schedule(self.autosave_interval(), Task::Autosave, Guard::Always);
            }
        }
    }

    fn order_interval(&self) -> u64 {
        self.config.order_interval_ms.max(1)
    }

    fn autosave_interval(&self) -> u64 {
        self.config.autosave_interval_ms.max(1)
    }

    fn respawn_window(&self) -> (u64, u64) {
        let (a, b) = (self.config.respawn_min_ms, self.config.respawn_max_ms);
        (a.min(b), a.max(b))
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Write the ledger to the current slot. Failures are logged and the
    /// session carries on.
    pub fn save_progress(&mut self) -> bool {
        let data = SlotData::from_ledger(&self.ledger, unix_millis());
        match self.store.save(&self.slot, &data) {
            Ok(()) => {
                log::debug!("Saved slot {} (${})", self.slot, data.money);
                self.events.push(UiEvent::Saved);
                true
            }
            Err(e) => {
                log::warn!("Failed to save slot {}: {}", self.slot, e);
                false
            }
        }
    }

    /// Snapshot the whole session with bincode.
    pub fn save_session<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        let mut customers = Vec::with_capacity(self.seating.len());
        for &entity in &self.seating {
            let entity_ref = self
                .world
                .entity(entity)
                .map_err(|_| SaveError::Mismatch("customer entity missing".to_string()))?;
            let (Some(customer), Some(position), Some(facing), Some(tint)) = (
                entity_ref.get::<&Customer>(),
                entity_ref.get::<&Position>(),
                entity_ref.get::<&Facing>(),
                entity_ref.get::<&Tint>(),
            ) else {
                return Err(SaveError::Mismatch("customer components missing".to_string()));
            };
            customers.push(SerializableCustomer {
                customer: *customer,
                position: *position,
                facing: *facing,
                tint: *tint,
                walking: entity_ref.get::<&Walking>().map(|w| (*w).clone()),
            });
        }

        let data = SessionData {
            version: SAVE_VERSION,
            slot: self.slot.clone(),
            clock_ms: self.scheduler.now(),
            ledger: self.ledger.clone(),
            tables: self.tables.clone(),
            customers,
            player: self.player,
            door_open: self.door_open,
            oven: self.oven.clone(),
            timers: self.scheduler.pending(),
            next_token: self.next_token,
        };
        bincode::serialize_into(writer, &data)?;
        Ok(())
    }

    /// Replace this session with a snapshot. The layout must match.
    pub fn load_session<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let data: SessionData = bincode::deserialize_from(reader)?;
        if data.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: data.version,
            });
        }
        if data.tables.len() != self.tables.len() || data.customers.len() != self.tables.len() {
            return Err(SaveError::Mismatch(format!(
                "snapshot has {} tables, layout has {}",
                data.tables.len(),
                self.tables.len()
            )));
        }

        self.world.clear();
        self.seating.clear();
        for sc in data.customers {
            let entity = self
                .world
                .spawn((sc.customer, sc.position, sc.facing, sc.tint));
            if let Some(walking) = sc.walking {
                let _ = self.world.insert_one(entity, walking);
            }
            self.seating.push(entity);
        }

        self.slot = data.slot;
        self.tables = data.tables;
        self.ledger = data.ledger;
        self.player = data.player;
        self.door_open = data.door_open;
        self.oven = data.oven;
        self.scheduler = Scheduler::restore(data.clock_ms, data.timers);
        self.next_token = data.next_token;
        self.phase = EnginePhase::Running;
        log::info!("Session restored at {} ms on slot {}", data.clock_ms, self.slot);
        Ok(())
    }

    // ── Views ──────────────────────────────────────────────────────────

    /// Take all queued UI events.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tables with an active order, in table order.
    pub fn order_summary(&self) -> Vec<OrderLine> {
        self.tables
            .iter()
            .filter_map(|t| {
                t.order.order().map(|dish| OrderLine {
                    table: t.index,
                    dish,
                    taken: t.order.is_taken(),
                    patience: t.order.patience_fraction(),
                })
            })
            .collect()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            money: self.ledger.money(),
            order_line: self.player.order_line(),
            status: self.last_status.as_ref().map(|s| s.to_string()),
            door_open: self.door_open,
            cooking: self.oven.cooking,
            ready: self.oven.counter.clone(),
            orders: self.order_summary(),
        }
    }

    /// Broken table ↔ customer links. Empty when every table has exactly
    /// one customer that points back at it.
    pub fn seating_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.seating.len() != self.tables.len() {
            problems.push(format!(
                "{} seats for {} tables",
                self.seating.len(),
                self.tables.len()
            ));
        }
        for (table, &entity) in self.seating.iter().enumerate() {
            match self.world.get::<&Customer>(entity) {
                Ok(c) if c.table == table => {}
                Ok(c) => problems.push(format!("table {} seats customer of table {}", table, c.table)),
                Err(_) => problems.push(format!("table {} has no customer", table)),
            }
        }
        let customers = self.world.query::<&Customer>().iter().count();
        if customers != self.tables.len() {
            problems.push(format!("{} customers for {} tables", customers, self.tables.len()));
        }
        problems
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn clock_ms(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &RestaurantLayout {
        &self.layout
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn seating(&self) -> &[Entity] {
        &self.seating
    }

    pub fn customer(&self, table: usize) -> Option<Customer> {
        let entity = *self.seating.get(table)?;
        self.world.get::<&Customer>(entity).ok().map(|c| *c)
    }

    pub fn customer_position(&self, table: usize) -> Option<Point> {
        let entity = *self.seating.get(table)?;
        self.world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn customer_tint(&self, table: usize) -> Option<Tint> {
        let entity = *self.seating.get(table)?;
        self.world.get::<&Tint>(entity).ok().map(|t| *t)
    }

    pub fn is_walking(&self, table: usize) -> bool {
        self.seating
            .get(table)
            .map(|&e| self.world.get::<&Walking>(e).is_ok())
            .unwrap_or(false)
    }

    /// Respawn timers currently queued for a table.
    pub fn pending_respawns(&self, table: usize) -> usize {
        self.scheduler
            .count(|t| t.task == Task::RespawnCustomer { table })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Move the player instantly (no collision).
    pub fn teleport_player(&mut self, position: Point) {
        self.player.position = position;
    }

    pub fn oven(&self) -> &Oven {
        &self.oven
    }

    pub fn door_open(&self) -> bool {
        self.door_open
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn last_status(&self) -> Option<&Status> {
        self.last_status.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    fn report(&mut self, status: Status) -> Status {
        self.events.push(UiEvent::Status(status.clone()));
        self.last_status = Some(status.clone());
        status
    }

    fn solids(&self) -> Vec<Rect> {
        let mut solids = self.walls.clone();
        if !self.door_open {
            solids.push(self.layout.top_door);
        }
        solids
    }

    /// Area the player's centre may occupy.
    fn player_bounds(&self) -> Rect {
        let half = PLAYER_SIZE / 2.0;
        Rect::new(
            half,
            -OUTSIDE_TOP_MARGIN + half,
            (self.layout.width - PLAYER_SIZE).max(0.0),
            (self.layout.height + OUTSIDE_TOP_MARGIN - PLAYER_SIZE).max(0.0),
        )
    }
}

fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn quiet_config() -> GameConfig {
        GameConfig {
            seed: Some(9),
            order_chance: 0.0,
            ..Default::default()
        }
    }

    fn started() -> GameEngine<MemoryStore> {
        let mut engine = GameEngine::new(quiet_config(), MemoryStore::new(), "default");
        engine.start();
        engine
    }

    #[test]
    fn test_new_engine_links_every_table() {
        let engine = GameEngine::new(quiet_config(), MemoryStore::new(), "default");
        assert_eq!(engine.phase(), EnginePhase::Init);
        assert_eq!(engine.tables().len(), 5);
        assert!(engine.seating_violations().is_empty());
        assert!((0..5).all(|t| !engine.customer(t).unwrap().visible));
    }

    #[test]
    fn test_update_before_start_is_ignored() {
        let mut engine = GameEngine::new(quiet_config(), MemoryStore::new(), "default");
        engine.update(10_000, &FrameInput::default());
        assert_eq!(engine.clock_ms(), 0);
    }

    #[test]
    fn test_staggered_arrivals() {
        let mut engine = started();
        engine.update(500, &FrameInput::default());
        assert!(engine.customer(0).unwrap().visible);
        assert!(!engine.customer(1).unwrap().visible);
        engine.update(400, &FrameInput::default());
        assert!(engine.customer(1).unwrap().visible);
        assert!(engine.is_walking(1));
        assert_eq!(engine.customer_position(1), Some(engine.layout().spawn));
    }

    #[test]
    fn test_shutdown_drops_timers() {
        let mut engine = started();
        assert!(!engine.scheduler().is_empty());
        engine.shutdown();
        assert!(engine.scheduler().is_empty());
        assert_eq!(engine.phase(), EnginePhase::Stopped);
        // shutdown saved progress
        assert!(engine.store().load("default").unwrap().is_some());
    }

    #[test]
    fn test_dispose_and_fridge() {
        let mut engine = started();
        assert_eq!(engine.dispose(), Status::NothingToDispose);
        engine.grab_ingredient(Dish::Soup);
        assert_eq!(engine.player().holding, Holding::RawIngredient(Dish::Soup));
        assert_eq!(engine.dispose(), Status::Disposed("RawSoup"));
        assert!(engine.player().holding.is_empty());
    }

    #[test]
    fn test_cook_and_pick_up() {
        let mut engine = started();
        engine.grab_ingredient(Dish::Pizza);
        let oven = engine.layout().oven;
        engine.teleport_player(Point::new(oven.x, oven.y - 20.0));

        assert_eq!(engine.kitchen_interact(), Status::Cooking(Dish::Pizza));
        assert!(engine.player().holding.is_empty());
        engine.grab_ingredient(Dish::Soup);
        assert_eq!(engine.kitchen_interact(), Status::AlreadyCooking);
        engine.dispose();

        engine.update(2_999, &FrameInput::default());
        assert_eq!(engine.oven().cooking, Some(Dish::Pizza));
        engine.update(1, &FrameInput::default());
        assert_eq!(engine.oven().counter, vec![Dish::Pizza]);
        assert_eq!(engine.last_status(), Some(&Status::Cooked(Dish::Pizza)));

        assert_eq!(engine.kitchen_interact(), Status::PickedUp(Dish::Pizza));
        assert_eq!(engine.player().holding, Holding::Food(Dish::Pizza));
    }

    #[test]
    fn test_pickup_requires_proximity() {
        let mut engine = started();
        engine.grab_ingredient(Dish::Salad);
        engine.kitchen_interact();
        engine.update(3_000, &FrameInput::default());
        engine.teleport_player(Point::new(100.0, 100.0));
        assert_eq!(engine.kitchen_interact(), Status::KitchenArea);
        assert_eq!(engine.oven().counter.len(), 1);
    }

    #[test]
    fn test_door_blocks_player_until_opened() {
        let mut engine = started();
        let door = engine.layout().top_door;
        engine.teleport_player(Point::new(door.center().x, 40.0));
        let up = FrameInput {
            up: true,
            ..Default::default()
        };
        engine.update(1_000, &up);
        assert!(engine.player().position.y > door.bottom());

        engine.toggle_door();
        assert!(engine.door_open());
        engine.update(1_000, &up);
        assert!(engine.player().position.y < 0.0);
    }

    #[test]
    fn test_interact_press_uses_zone_precedence() {
        let mut engine = started();
        let zone = engine.layout().door_zone;
        engine.teleport_player(zone.center());
        assert_eq!(engine.interact(), Some(InteractTarget::Door));
        assert!(engine.door_open());

        let fridge = engine.layout().fridge_zone.center();
        engine.teleport_player(fridge);
        engine.drain_events();
        engine.update(16, &FrameInput::interact());
        assert!(engine.drain_events().contains(&UiEvent::FridgeOpened));
    }

    #[test]
    fn test_order_summary_lines() {
        let mut engine = started();
        engine.post_order(2, Dish::Soup, 10_000).unwrap();
        let lines = engine.order_summary();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "Table 3: Soup - Waiting");
        assert_eq!(engine.hud().money_text(), "Money: $0");
    }
}
