//! Command-line interface
//!
//! Without a subcommand the interactive menu runs. Every menu action is also
//! available as a one-shot subcommand.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use vital_signs_data::config::{ConfigError, StorageConfig};
use vital_signs_data::line_format::RewriteFormat;
use vital_signs_data::repository::VisitLogTrait;
use vital_signs_domain::services::{PatientRecordService, VisitDateFilter};

use crate::console::{self, actions};
use crate::export;

#[derive(Debug, Parser)]
#[command(
    name = "vital-signs",
    version,
    about = "Record and analyze patient vital-sign visits",
    long_about = "vital-signs keeps patient visits in a line-oriented data file.\n\n\
        EXAMPLES:\n\
        \n  vital-signs                               Start the interactive menu\n\
        \n  vital-signs -f clinic.txt show --patient 3   Show the visits of patient 3\n\
        \n  vital-signs stats                         Mean vital signs for all patients\n\
        \n  vital-signs visits --year 2023 --month 1  Visits in January 2023"
)]
pub struct Cli {
    /// Data file (overrides VITALS_DATA_FILE)
    #[arg(short = 'f', long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Format used when the data file is rewritten: lines or legacy
    /// (overrides VITALS_REWRITE_FORMAT)
    #[arg(long, value_name = "FORMAT")]
    pub rewrite_format: Option<RewriteFormat>,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Run the interactive menu
    Menu,

    /// Display patient visits
    Show {
        /// Only this patient
        #[arg(long)]
        patient: Option<i64>,
    },

    /// Add a visit
    Add {
        #[arg(allow_negative_numbers = true)]
        patient: i64,
        /// Visit date (YYYY-MM-DD)
        date: String,
        /// Temperature in Celsius
        #[arg(allow_negative_numbers = true)]
        temperature: f64,
        #[arg(allow_negative_numbers = true)]
        heart_rate: i64,
        #[arg(allow_negative_numbers = true)]
        respiratory_rate: i64,
        #[arg(allow_negative_numbers = true)]
        systolic_bp: i64,
        #[arg(allow_negative_numbers = true)]
        diastolic_bp: i64,
        #[arg(allow_negative_numbers = true)]
        oxygen_saturation: i64,
    },

    /// Mean vital signs of one patient, or of all patients with 0
    Stats {
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        patient: i64,
    },

    /// Visits in a year and/or month
    Visits {
        /// Year, 0 for any
        #[arg(long, default_value_t = 0)]
        year: i32,
        /// Month, 0 for any
        #[arg(long, default_value_t = 0)]
        month: u32,
    },

    /// Patients who need a follow-up visit
    FollowUp,

    /// Delete every visit of a patient
    Delete {
        #[arg(allow_negative_numbers = true)]
        patient: i64,
    },

    /// Print all patients as JSON
    Export {
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Storage configuration from the environment, overridden by flags
    pub fn storage_config(&self) -> Result<StorageConfig, ConfigError> {
        let mut config = StorageConfig::from_env()?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut StorageConfig) {
        if let Some(data_file) = &self.data_file {
            config.data_file = data_file.clone();
        }
        if let Some(rewrite_format) = self.rewrite_format {
            config.rewrite_format = rewrite_format;
        }
    }
}

/// Run one command against the service
///
/// `input` is only read by the interactive menu.
pub fn dispatch<L, R, W>(
    service: &mut PatientRecordService<L>,
    command: Command,
    input: R,
    out: &mut W,
) -> Result<()>
where
    L: VisitLogTrait,
    R: BufRead,
    W: Write,
{
    match command {
        Command::Menu => console::run_menu(service, input, out)?,
        Command::Show { patient: None } => actions::display_patients(service, out)?,
        Command::Show { patient: Some(patient) } => {
            actions::display_patient(service, patient, out)?
        }
        Command::Add {
            patient,
            date,
            temperature,
            heart_rate,
            respiratory_rate,
            systolic_bp,
            diastolic_bp,
            oxygen_saturation,
        } => {
            let input = actions::VisitInput {
                patient_id: patient,
                date,
                temperature,
                heart_rate,
                respiratory_rate,
                systolic_bp,
                diastolic_bp,
                oxygen_saturation,
            };
            actions::add_visit(service, input, out)?;
        }
        Command::Stats { patient } => actions::show_statistics(service, patient, out)?,
        Command::Visits { year, month } => {
            let filter = VisitDateFilter::from_menu_input(year, month);
            actions::show_visits_by_date(service, filter, out)?
        }
        Command::FollowUp => actions::show_follow_up(service, out)?,
        Command::Delete { patient } => actions::delete_visits(service, patient, out)?,
        Command::Export { pretty } => {
            let json = export::patients_as_json(service, pretty)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
