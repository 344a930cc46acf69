use std::io::{self, BufRead, Write};

use dotenvy::dotenv;
use tracing::info;

use face_wizard::api::ApiClient;
use face_wizard::utils::logging::init_logging;
use face_wizard::wizard::{Candidate, FormUpdate, Gender, Step, WizardController};

const MIN_AGE: u8 = 10;
const MAX_AGE: u8 = 80;

fn usage() -> &'static str {
    "Commands:\n  \
     set gender <male|female|unset>\n  \
     set hair <text>        set age <10-80>\n  \
     set similar <text>     set features <text>\n  \
     start                  request two candidates\n  \
     pick <a|b>             choose a candidate\n  \
     note <text>            set the refinement note\n  \
     refine                 request refinement candidates\n  \
     apply <a|b>            choose a refinement\n  \
     save                   store the selected image\n  \
     back | show | help | quit"
}

fn parse_candidate(value: &str) -> Option<Candidate> {
    match value {
        "a" | "A" => Some(Candidate::A),
        "b" | "B" => Some(Candidate::B),
        _ => None,
    }
}

fn parse_field_update(field: &str, value: &str) -> Option<FormUpdate> {
    match field {
        "gender" => match value {
            "male" => Some(FormUpdate::Gender(Some(Gender::Male))),
            "female" => Some(FormUpdate::Gender(Some(Gender::Female))),
            "unset" => Some(FormUpdate::Gender(None)),
            _ => None,
        },
        "hair" => Some(FormUpdate::Hairstyle(value.to_string())),
        // The age bound is the input boundary's job, so clamp here.
        "age" => value
            .parse::<u8>()
            .ok()
            .map(|age| FormUpdate::Age(age.clamp(MIN_AGE, MAX_AGE))),
        "similar" => Some(FormUpdate::Resemblance(value.to_string())),
        "features" => Some(FormUpdate::Features(value.to_string())),
        _ => None,
    }
}

fn render(wizard: &WizardController) {
    match wizard.step() {
        Step::Input => {
            let form = wizard.form();
            let gender = match form.gender {
                Some(Gender::Male) => "male",
                Some(Gender::Female) => "female",
                None => "unset",
            };
            println!(
                "[input] gender={gender} hair='{}' age={} similar='{}' features='{}'",
                form.hairstyle, form.age, form.resemblance, form.features
            );
        }
        Step::Choose => {
            if let Some(pair) = wizard.candidates() {
                println!("[choose] a: {}  b: {}", pair.a, pair.b);
            }
        }
        Step::Review => {
            if let Some(url) = wizard.result_url() {
                println!("[review] selected: {url}");
            }
        }
        Step::ChooseRefinement => {
            if let Some(pair) = wizard.refinements() {
                println!("[refinement] a: {}  b: {}", pair.a, pair.b);
            }
        }
    }
    if let Some(notice) = wizard.notice() {
        println!("notice: {notice}");
    }
}

async fn handle_line(wizard: &mut WizardController, line: &str) -> bool {
    let mut parts = line.splitn(3, char::is_whitespace);
    let command = parts.next().unwrap_or_default();

    match command {
        "" => {}
        "set" => {
            let field = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default().trim();
            match parse_field_update(field, value) {
                Some(update) => wizard.update_field(update),
                None => println!("Unrecognized field or value. {}", usage()),
            }
        }
        "start" => wizard.start().await,
        "pick" => match parts.next().and_then(parse_candidate) {
            Some(which) => wizard.pick(which),
            None => println!("Usage: pick <a|b>"),
        },
        "note" => {
            let rest = line.strip_prefix("note").unwrap_or_default().trim();
            wizard.set_refine_note(rest);
        }
        "refine" => wizard.refine().await,
        "apply" => match parts.next().and_then(parse_candidate) {
            Some(which) => wizard.pick_refinement(which),
            None => println!("Usage: apply <a|b>"),
        },
        "save" => wizard.complete().await,
        "back" => wizard.back(),
        "show" => {}
        "help" => println!("{}", usage()),
        "quit" | "exit" => return false,
        other => println!("Unknown command '{other}'. {}", usage()),
    }

    render(wizard);
    true
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _logging_guards = init_logging();

    let mut wizard = WizardController::new(ApiClient::from_config());
    info!("Face wizard started");
    println!("{}", usage());
    render(&wizard);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if !handle_line(&mut wizard, line.trim()).await {
            break;
        }
    }

    info!("Face wizard exiting");
    Ok(())
}
