use clap::{Args, Subcommand, ValueEnum};

use luna_core::{Event, EventKind, Logbook, LogbookSession};

use super::{confirm, display_name, open_repository};
use crate::config::Config;

#[derive(Clone, Copy, ValueEnum)]
pub enum Side {
    Left,
    Right,
    Both,
}

#[derive(Args)]
pub struct LogCommand {
    /// Logbook to write to (defaults to the default logbook)
    #[arg(long, short, global = true, default_value = "")]
    logbook: String,

    #[command(subcommand)]
    pub event: LogEvent,
}

#[derive(Subcommand)]
pub enum LogEvent {
    /// Bottle feeding; milliliters are remembered as the new default
    Bottle {
        /// Milliliters given (defaults to the remembered amount)
        ml: Option<u32>,
    },

    /// Weight measurement
    Weight {
        /// Grams
        grams: u32,
    },

    /// Breastfeeding session
    Nurse {
        /// Which side
        #[arg(value_enum)]
        side: Side,

        /// Session duration in minutes
        #[arg(long, short)]
        minutes: Option<u32>,
    },

    /// Diaper change (pee)
    Pee,

    /// Diaper change (poo)
    Poo,

    /// Colic episode
    Colic,

    /// Body temperature
    Temperature {
        /// Degrees Celsius, e.g. 36.8
        celsius: f32,
    },

    /// Medicine given
    Medicine {
        /// What was given
        notes: String,

        /// Dose in milligrams
        #[arg(long, short)]
        quantity: Option<u32>,
    },

    /// Solid food
    Food {
        /// What was eaten
        #[arg(default_value = "")]
        notes: String,

        /// Amount in grams
        #[arg(long, short)]
        quantity: Option<u32>,
    },

    /// Enema
    Enema {
        #[arg(default_value = "")]
        notes: String,
    },

    /// Free-text note
    Note {
        text: String,
    },

    /// Custom event
    Custom {
        text: String,

        #[arg(long, short)]
        quantity: Option<u32>,
    },
}

impl LogCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (event, bottle_ml) = self.build_event(config)?;

        let repo = open_repository(config)?;
        let mut session = LogbookSession::open(repo, &self.logbook).await?;
        session.log_event(event).await?;
        println!("Event added to logbook {}.", display_name(&self.logbook));

        if let Some(ml) = bottle_ml {
            if config.bottle_ml != Some(ml) {
                let mut updated = config.clone();
                updated.bottle_ml = Some(ml);
                updated.save()?;
            }
        }

        // Capacity escape valve: offer a lossy trim once the logbook grows
        // past its safe size.
        if session.logbook().is_oversized() {
            println!(
                "This logbook holds {} events, more than the safe limit of {}.",
                session.logbook().len(),
                Logbook::MAX_SAFE_SIZE
            );
            if confirm("Trim it down to the most recent 15000? Trimmed events are lost forever.")? {
                let dropped = session.trim_and_save().await?;
                println!("Dropped {dropped} events.");
            }
        }

        Ok(())
    }

    /// Builds the event to log. Also returns the bottle content to remember,
    /// if this was a bottle feeding.
    fn build_event(
        &self,
        config: &Config,
    ) -> Result<(Event, Option<u32>), Box<dyn std::error::Error>> {
        let event = match &self.event {
            LogEvent::Bottle { ml } => {
                let Some(ml) = ml.or(config.bottle_ml) else {
                    return Err(
                        "no amount given and none remembered; run 'luna log bottle <ML>'".into(),
                    );
                };
                return Ok((
                    Event::new(EventKind::BabyBottle).with_quantity(ml),
                    Some(ml),
                ));
            }
            LogEvent::Weight { grams } => Event::new(EventKind::Weight).with_quantity(*grams),
            LogEvent::Nurse { side, minutes } => {
                let kind = match side {
                    Side::Left => EventKind::BreastfeedingLeft,
                    Side::Right => EventKind::BreastfeedingRight,
                    Side::Both => EventKind::BreastfeedingBoth,
                };
                // Stored as seconds of duration.
                Event::new(kind).with_quantity(minutes.unwrap_or(0) * 60)
            }
            LogEvent::Pee => Event::new(EventKind::DiaperPee),
            LogEvent::Poo => Event::new(EventKind::DiaperPoo),
            LogEvent::Colic => Event::new(EventKind::Colic),
            LogEvent::Temperature { celsius } => {
                if !(30.0..=45.0).contains(celsius) {
                    return Err(format!("{celsius} °C is not a plausible body temperature").into());
                }
                // Stored in tenths of a degree.
                Event::new(EventKind::Temperature)
                    .with_quantity((celsius * 10.0).round() as u32)
            }
            LogEvent::Medicine { notes, quantity } => Event::new(EventKind::Medicine)
                .with_quantity(quantity.unwrap_or(0))
                .with_notes(notes.clone()),
            LogEvent::Food { notes, quantity } => Event::new(EventKind::Food)
                .with_quantity(quantity.unwrap_or(0))
                .with_notes(notes.clone()),
            LogEvent::Enema { notes } => Event::new(EventKind::Enema).with_notes(notes.clone()),
            LogEvent::Note { text } => Event::new(EventKind::Note).with_notes(text.clone()),
            LogEvent::Custom { text, quantity } => Event::new(EventKind::Custom)
                .with_quantity(quantity.unwrap_or(0))
                .with_notes(text.clone()),
        };
        Ok((event, None))
    }
}
