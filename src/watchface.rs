//! Clock face state and event handling
//!
//! [`Watchface`] owns all mutable state of the face. The host runtime turns
//! each of its callbacks into an [`Event`] and hands it to
//! [`Watchface::handle`]; handlers never overlap.

use chrono::{NaiveDateTime, Timelike};

use crate::{
    activity::Activity,
    format::{self, DateFormatter},
    sensors::{BodyPresenceSensor, HeartRateSensor, SensorManager},
    system::{
        settings::{Preferences, Settings},
        time::Granularity,
    },
    ui::{Binder, Color, ElementId, Group, Opacity, LAYOUT},
};

/// Everything the host runtime reports to the clock face
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Clock tick at the current granularity
    Tick(NaiveDateTime),
    /// Heart-rate reading in bpm
    HeartRate(u16),
    /// Body-presence reading
    Presence(bool),
    /// User settings changed
    Settings(Settings),
    /// Locale or clock preference changed
    Preferences(Preferences),
    /// New activity totals for today
    Activity(Activity),
    /// Screen switched on or off
    DisplayChange { on: bool },
    /// Background touched
    BackgroundTap,
}

pub struct Watchface<H, P> {
    binder: Binder,
    sensors: SensorManager<H, P>,
    preferences: Preferences,
    activity: Activity,
    /// Time of the last tick, re-rendered on settings changes
    last_date: Option<NaiveDateTime>,
    /// Hide decorations on display changes
    enable_neat: bool,
    foreground: Color,
    granularity: Granularity,
}

impl<H, P> Watchface<H, P>
where
    H: HeartRateSensor,
    P: BodyPresenceSensor,
{
    /// Build the face with its sensors and force the decorations visible
    pub fn new(preferences: Preferences, sensors: SensorManager<H, P>) -> Self {
        let settings = Settings::default();
        let mut face = Self {
            binder: Binder::new(&LAYOUT),
            sensors,
            preferences,
            activity: Activity::default(),
            last_date: None,
            enable_neat: !settings.disable_neat,
            foreground: settings.fg_color,
            granularity: Granularity::Seconds,
        };
        face.apply_font_sizes();
        face.toggle_display(true);
        face
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    pub fn binder_mut(&mut self) -> &mut Binder {
        &mut self.binder
    }

    pub fn sensors(&self) -> &SensorManager<H, P> {
        &self.sensors
    }

    /// Tick interval the clock source should use
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn neat_enabled(&self) -> bool {
        self.enable_neat
    }

    /// Dispatch one host event
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Tick(date) => self.on_tick(date),
            Event::HeartRate(bpm) => self.sensors.on_heart_rate(bpm, &mut self.binder),
            Event::Presence(present) => self.sensors.on_presence(present, &mut self.binder),
            Event::Settings(settings) => self.on_settings(settings),
            Event::Preferences(preferences) => self.on_preferences(preferences),
            Event::Activity(activity) => self.activity = activity,
            Event::DisplayChange { on } => self.on_display_change(on),
            Event::BackgroundTap => self.on_background_tap(),
        }
    }

    /// Recompute every text field for the tick
    pub fn on_tick(&mut self, date: NaiveDateTime) {
        let formatter = DateFormatter::new(
            self.preferences.twelve_hour(),
            date,
            self.preferences.locale,
        );

        self.binder.set_text(ElementId::Hours, &formatter.format_hours());
        self.binder.set_text(ElementId::Minutes, &formatter.format_minutes());
        self.binder.set_text(ElementId::AmPm, &formatter.format_am_pm());
        self.binder.set_text(ElementId::Day, formatter.format_weekday());
        self.binder.set_text(ElementId::Date, &formatter.format_date());
        self.binder
            .set_text(ElementId::Steps, &format::format_count(self.activity.steps));
        self.binder
            .set_text(ElementId::Calories, &format::format_count(self.activity.calories));
        self.last_date = Some(date);

        self.update_second_hand(Some(date));
    }

    /// Apply changed settings
    pub fn on_settings(&mut self, settings: Settings) {
        info!("Settings changed: {}", settings);

        self.binder
            .fill_group(Group::Background, settings.bg_color.rgb565());
        self.foreground = settings.fg_color;
        self.binder
            .fill_group(Group::Colored, settings.fg_color.rgb565());

        self.granularity = if settings.disable_seconds {
            Granularity::Minutes
        } else {
            Granularity::Seconds
        };
        if settings.disable_seconds {
            self.update_second_hand(self.last_date);
        }

        self.binder.set_opacity(
            ElementId::AmPm,
            if settings.disable_meridiem {
                Opacity::TRANSPARENT
            } else {
                Opacity::OPAQUE
            },
        );

        self.enable_neat = !settings.disable_neat;
        self.toggle_display(settings.disable_neat);
    }

    /// Apply changed locale or clock preference
    pub fn on_preferences(&mut self, preferences: Preferences) {
        let locale_changed = preferences.locale != self.preferences.locale;
        self.preferences = preferences;
        if locale_changed {
            self.apply_font_sizes();
        }
        if let Some(date) = self.last_date {
            self.on_tick(date);
        }
    }

    /// Hide the decorations when the screen changes, if neat mode is on
    pub fn on_display_change(&mut self, on: bool) {
        debug!("Display {}", if on { "on" } else { "off" });
        if self.enable_neat {
            self.toggle_display(false);
        }
    }

    /// Reveal the decorations while the background is touched
    pub fn on_background_tap(&mut self) {
        self.toggle_display(true);
    }

    fn toggle_display(&mut self, on: bool) {
        self.binder.toggle_neat_elements(on);
        self.binder.toggle_colored_elements(on, self.foreground);
    }

    fn apply_font_sizes(&mut self) {
        let sizes = self.preferences.locale.time_font_sizes();
        self.binder.set_font_size(ElementId::Hours, sizes.hours);
        self.binder.set_font_size(ElementId::Minutes, sizes.minutes);
    }

    /// Stretch the separator with the seconds, or to full width per minute
    fn update_second_hand(&mut self, date: Option<NaiveDateTime>) {
        let middle = self.binder.width() as i32 / 2;
        let full = middle * 9 / 10;

        let half = match (self.granularity, date) {
            (Granularity::Minutes, _) => full,
            (Granularity::Seconds, Some(date)) => date.second().min(59) as i32 * full / 60,
            // Nothing to show before the first tick
            (Granularity::Seconds, None) => return,
        };

        self.binder
            .set_line_span(ElementId::Separator, middle - half, middle + half);
    }
}
