//! Game session: owns the engine and routes host input into it.
//!
//! One session exists per run. Chat lines are normalized, classified and
//! applied to the engine; `/wwc` lines go to the command surface; ticks
//! advance the engine and dispatch whatever side effects came due.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::chat::{EventClassifier, EventKind, MessageNormalizer};
use crate::commands;
use crate::common::{ChatEvent, EngineEffect};
use crate::common::resources::{DEFAULT_COOLDOWN_SECONDS, UNKNOWN_TERRITORY};
use crate::config::{save_config, Config, TimerSettings};
use crate::engine::{Clock, CooldownEngine};
use crate::host::{match_territory_name, ActionSink, NotificationSink, TerritoryResolver};
use crate::hud::HudFormatter;

pub struct Session {
    normalizer: MessageNormalizer,
    classifier: EventClassifier,
    engine: CooldownEngine,
    config: Config,
    /// Where config changes made by commands are saved; `None` keeps them in memory.
    config_path: Option<PathBuf>,
    resolver: Box<dyn TerritoryResolver>,
    actions: Box<dyn ActionSink>,
    notifications: Box<dyn NotificationSink>,
    hud: HudFormatter,
}

impl Session {
    pub fn new(
        config: Config,
        clock: Box<dyn Clock>,
        resolver: Box<dyn TerritoryResolver>,
        actions: Box<dyn ActionSink>,
        notifications: Box<dyn NotificationSink>,
    ) -> Self {
        let engine = CooldownEngine::new(clock, TimerSettings::from(&config));
        let hud = HudFormatter::from_config(&config);

        Self {
            normalizer: MessageNormalizer::new(),
            classifier: EventClassifier::new(),
            engine,
            config,
            config_path: None,
            resolver,
            actions,
            notifications,
            hud,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &CooldownEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CooldownEngine {
        &mut self.engine
    }

    pub fn resolver(&self) -> &dyn TerritoryResolver {
        self.resolver.as_ref()
    }

    pub fn resolver_mut(&mut self) -> &mut dyn TerritoryResolver {
        self.resolver.as_mut()
    }

    pub fn notifications_mut(&mut self) -> &mut dyn NotificationSink {
        self.notifications.as_mut()
    }

    /// Apply a config change, refresh derived state and save it.
    pub fn update_config(&mut self, update: impl FnOnce(&mut Config)) {
        update(&mut self.config);
        self.engine.update_settings(TimerSettings::from(&self.config));
        self.hud = HudFormatter::from_config(&self.config);

        if let Some(path) = &self.config_path {
            if let Err(e) = save_config(&self.config, path) {
                error!("Failed to save config: {}", e);
            }
        }
    }

    /// Handle one line of host input.
    ///
    /// Returns the replies for operator commands; chat lines produce none.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        match commands::parse_command(line) {
            Some(Ok(command)) => match commands::execute(self, command) {
                Ok(replies) => replies,
                Err(e) => vec![e.to_string()],
            },
            Some(Err(e)) => vec![e.to_string()],
            None => {
                self.handle_chat(line);
                Vec::new()
            }
        }
    }

    /// Normalize, classify and apply a raw chat line.
    pub fn handle_chat(&mut self, raw: &str) -> Option<ChatEvent> {
        if !self.config.is_mod_enabled {
            return None;
        }

        let text = self.normalizer.normalize(raw);
        if text.is_empty() {
            return None;
        }

        let queue_signals = self.config.remove_timer_on_queue;
        let captures = self.config.enable_capture_reminder;
        let event = self.classifier.classify_with(&text, |kind| match kind {
            EventKind::WarStart | EventKind::Defense => queue_signals,
            EventKind::Capture => captures,
            EventKind::Loss | EventKind::CooldownStart => true,
        })?;

        self.handle_event(event.clone());
        Some(event)
    }

    pub fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::CooldownStarted { minutes, seconds } => {
                let total = i64::from(minutes) * 60 + i64::from(seconds);
                let adjusted = (total + i64::from(self.config.timer_offset_seconds)).max(0);
                let territory = self.resolver.current_territory_name().unwrap_or_else(|| {
                    warn!(
                        "Could not determine current territory, using '{}'",
                        UNKNOWN_TERRITORY
                    );
                    UNKNOWN_TERRITORY.to_string()
                });

                info!(
                    "Cooldown detected: {}m {}s (total {}s, adjusted {}s) for {}",
                    minutes, seconds, total, adjusted, territory
                );
                self.engine.start_cooldown(adjusted, &territory);
            }
            ChatEvent::WarStarting { territory, minutes } => {
                let name = self.canonical_name(&territory);
                info!("War for {} starts in {} minutes", name, minutes);
                if self.engine.remove_cooldown(&name) {
                    info!("Removed timer for {}: war queued", name);
                }
            }
            ChatEvent::DefenseReported { territory, level } => {
                let name = self.canonical_name(&territory);
                info!("{} queued with {} defense", name, level.name());
                if self.engine.remove_cooldown(&name) {
                    info!("Removed timer for {}: territory queued", name);
                }
            }
            ChatEvent::TerritoryCaptured {
                territory,
                from_guild,
            } => {
                match &from_guild {
                    Some(guild) => info!("Captured {} from [{}]", territory, guild),
                    None => info!("Captured {}", territory),
                }
                let now = self.engine.now();
                self.engine.record_capture(&territory, now);
            }
            ChatEvent::TerritoryLost {
                territory,
                guild_tag,
            } => {
                info!("Lost {} to [{}]", territory, guild_tag);
                self.engine
                    .start_cooldown(DEFAULT_COOLDOWN_SECONDS, &territory);
            }
        }
    }

    /// Advance the engine and dispatch due effects. Idle while tracking is off.
    pub fn tick(&mut self) {
        if !self.config.is_mod_enabled {
            return;
        }

        let current = self.resolver.current_territory_name();
        let effects = self.engine.update_timers(current.as_deref());
        self.dispatch(effects);
    }

    /// Current HUD text, or `None` while the HUD is hidden.
    pub fn render_hud(&mut self) -> Option<String> {
        if !self.config.is_mod_enabled || !self.config.show_timer_hud {
            return None;
        }

        let timers = self.engine.get_visible_timers();
        let current = self.resolver.current_territory_name();
        Some(self.hud.render(&timers, current.as_deref()))
    }

    fn canonical_name(&self, territory: &str) -> String {
        match_territory_name(territory, &self.resolver.all_territory_names())
            .unwrap_or_else(|| territory.to_string())
    }

    fn dispatch(&mut self, effects: Vec<EngineEffect>) {
        for effect in effects {
            match effect {
                EngineEffect::PlaySound(sound) => self.notifications.play_sound(sound),
                EngineEffect::SendGuildAttack { territory } => {
                    debug!("Dispatching guild attack for {}", territory);
                    self.actions.send_dependent_action();
                }
                EngineEffect::Announce(announcement) => self
                    .notifications
                    .announce(announcement.template_key(), &announcement.args()),
            }
        }
    }
}
