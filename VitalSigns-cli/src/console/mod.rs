//! Interactive console menu
//!
//! The menu reads from any buffered reader and writes to any writer, so the
//! whole session can be driven from tests.

pub mod actions;
pub mod prompt;
pub mod render;

use std::io::{self, BufRead, Write};

use tracing::{debug, info};
use vital_signs_data::repository::VisitLogTrait;
use vital_signs_domain::services::{PatientRecordService, VisitDateFilter};

use actions::VisitInput;
use prompt::{Answer, Prompt};

const INVALID_PATIENT_ID: &str = "Invalid patient ID. Please enter a valid integer.";
const INVALID_INPUT: &str = "Invalid input. Please enter valid data.";

/// Menu entries in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    DisplayAll,
    DisplayPatient,
    AddVisit,
    Statistics,
    VisitsByDate,
    FollowUp,
    DeleteVisits,
    Quit,
}

impl MenuChoice {
    /// Parse the number typed at the menu prompt
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::DisplayAll),
            "2" => Some(MenuChoice::DisplayPatient),
            "3" => Some(MenuChoice::AddVisit),
            "4" => Some(MenuChoice::Statistics),
            "5" => Some(MenuChoice::VisitsByDate),
            "6" => Some(MenuChoice::FollowUp),
            "7" => Some(MenuChoice::DeleteVisits),
            "8" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Ask for a typed value inside a menu action.
/// Invalid input prints `$invalid` and returns to the menu; end of input ends the session.
macro_rules! ask {
    ($prompt:expr, $out:expr, $message:expr, $invalid:expr) => {
        match $prompt.ask_parsed($out, $message)? {
            Answer::Value(value) => value,
            Answer::Invalid(raw) => {
                debug!("Rejected input {:?}", raw);
                writeln!($out, "{}", $invalid)?;
                return Ok(Flow::Continue);
            }
            Answer::Closed => return Ok(Flow::Quit),
        }
    };
}

/// Print the menu
pub fn write_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n\nWelcome to the Health Information System\n\n")?;
    writeln!(out, "1. Display all patient data")?;
    writeln!(out, "2. Display patient data by ID")?;
    writeln!(out, "3. Add patient data")?;
    writeln!(out, "4. Display patient statistics")?;
    writeln!(out, "5. Find visits by year, month, or both")?;
    writeln!(out, "6. Find patients who need follow-up")?;
    writeln!(out, "7. Delete all visits of a particular patient")?;
    writeln!(out, "8. Quit\n")
}

/// Run the menu until the user quits or input ends
pub fn run_menu<L, R, W>(
    service: &mut PatientRecordService<L>,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    L: VisitLogTrait,
    R: BufRead,
    W: Write,
{
    let mut prompt = Prompt::new(input);
    info!("Console session started");

    loop {
        write_menu(out)?;
        let Some(raw) = prompt.ask(out, "Enter your choice (1-8): ")? else {
            break;
        };

        let flow = match MenuChoice::from_input(&raw) {
            Some(MenuChoice::Quit) => Flow::Quit,
            Some(choice) => {
                debug!("Menu choice {:?}", choice);
                run_choice(service, choice, &mut prompt, out)?
            }
            None => {
                writeln!(out, "Invalid choice. Please try again.\n")?;
                Flow::Continue
            }
        };

        if flow == Flow::Quit {
            break;
        }
    }

    info!("Console session ended");
    writeln!(out, "Goodbye!")
}

fn run_choice<L, R, W>(
    service: &mut PatientRecordService<L>,
    choice: MenuChoice,
    prompt: &mut Prompt<R>,
    out: &mut W,
) -> io::Result<Flow>
where
    L: VisitLogTrait,
    R: BufRead,
    W: Write,
{
    match choice {
        MenuChoice::DisplayAll => actions::display_patients(service, out)?,
        MenuChoice::DisplayPatient => {
            let patient_id: i64 = ask!(prompt, out, "Enter patient ID: ", INVALID_PATIENT_ID);
            actions::display_patient(service, patient_id, out)?;
        }
        MenuChoice::AddVisit => {
            let patient_id: i64 = ask!(prompt, out, "Enter patient ID: ", INVALID_INPUT);
            let date: String = ask!(prompt, out, "Enter date (YYYY-MM-DD): ", INVALID_INPUT);
            let temperature: f64 =
                ask!(prompt, out, "Enter temperature (Celsius): ", INVALID_INPUT);
            let heart_rate: i64 = ask!(prompt, out, "Enter heart rate (bpm): ", INVALID_INPUT);
            let respiratory_rate: i64 = ask!(
                prompt,
                out,
                "Enter respiratory rate (breaths per minute): ",
                INVALID_INPUT
            );
            let systolic_bp: i64 =
                ask!(prompt, out, "Enter systolic blood pressure (mmHg): ", INVALID_INPUT);
            let diastolic_bp: i64 =
                ask!(prompt, out, "Enter diastolic blood pressure (mmHg): ", INVALID_INPUT);
            let oxygen_saturation: i64 =
                ask!(prompt, out, "Enter oxygen saturation (%): ", INVALID_INPUT);

            let input = VisitInput {
                patient_id,
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
        MenuChoice::Statistics => {
            let patient_id: i64 = ask!(
                prompt,
                out,
                "Enter patient ID (or '0' for all patients): ",
                INVALID_PATIENT_ID
            );
            actions::show_statistics(service, patient_id, out)?;
        }
        MenuChoice::VisitsByDate => {
            let year: i32 =
                ask!(prompt, out, "Enter year (YYYY) (or 0 for all years): ", INVALID_INPUT);
            let month: u32 =
                ask!(prompt, out, "Enter month (MM) (or 0 for all months): ", INVALID_INPUT);
            let filter = VisitDateFilter::from_menu_input(year, month);
            actions::show_visits_by_date(service, filter, out)?;
        }
        MenuChoice::FollowUp => actions::show_follow_up(service, out)?,
        MenuChoice::DeleteVisits => {
            let patient_id: i64 = ask!(prompt, out, "Enter patient ID: ", INVALID_PATIENT_ID);
            actions::delete_visits(service, patient_id, out)?;
        }
        MenuChoice::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
