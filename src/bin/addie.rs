use std::env;

use addie::{
    assembly::LessonDraft,
    reference::load_reference_file,
    render::{render_lesson_plan, render_poi, render_slides, render_tsp, ToMarkdown},
    Config, Course, CourseStatus, Gateway, HttpTransport, JsonFileStore, Session, Wizard,
};
use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const USAGE: &str = "Usage:
  addie list
  addie new <mos> <topic> <target_hours> [reference_file]
  addie draft <mos> <topic> <lesson_hours>...
  addie develop <course_id> <lesson_id>
  addie tests <course_id>
  addie promote <course_id> <draft|validated|accredited>
  addie render <course_id> <poi|tsp|plan|slides> [lesson_id]";

enum Command {
    List,
    New {
        mos: String,
        topic: String,
        hours: u32,
        reference: Option<String>,
    },
    Draft {
        mos: String,
        topic: String,
        lesson_hours: Vec<u32>,
    },
    Develop {
        course_id: String,
        lesson_id: String,
    },
    Tests {
        course_id: String,
    },
    Promote {
        course_id: String,
        status: CourseStatus,
    },
    Render {
        course_id: String,
        document: String,
        lesson_id: Option<String>,
    },
}

fn parse_hours(raw: &str) -> anyhow::Result<u32> {
    raw.parse()
        .context(format!("'{}' is not a whole number of hours", raw))
}

fn parse_status(raw: &str) -> anyhow::Result<CourseStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "draft" => Ok(CourseStatus::Draft),
        "validated" => Ok(CourseStatus::Validated),
        "accredited" => Ok(CourseStatus::Accredited),
        other => bail!("unknown status '{}'", other),
    }
}

fn parse_command(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let name = args.next().context("a command is required")?;
    let mut arg = |what: &str| args.next().context(format!("{} is required", what));

    let command = match name.as_str() {
        "list" => Command::List,
        "new" => Command::New {
            mos: arg("mos")?,
            topic: arg("topic")?,
            hours: parse_hours(&arg("target_hours")?)?,
            reference: arg("reference_file").ok(),
        },
        "draft" => {
            let mos = arg("mos")?;
            let topic = arg("topic")?;
            let lesson_hours = args.map(|h| parse_hours(&h)).collect::<anyhow::Result<Vec<_>>>()?;
            if lesson_hours.is_empty() {
                bail!("at least one lesson duration is required");
            }
            Command::Draft {
                mos,
                topic,
                lesson_hours,
            }
        }
        "develop" => Command::Develop {
            course_id: arg("course_id")?,
            lesson_id: arg("lesson_id")?,
        },
        "tests" => Command::Tests {
            course_id: arg("course_id")?,
        },
        "promote" => Command::Promote {
            course_id: arg("course_id")?,
            status: parse_status(&arg("status")?)?,
        },
        "render" => Command::Render {
            course_id: arg("course_id")?,
            document: arg("document")?,
            lesson_id: arg("lesson_id").ok(),
        },
        other => bail!("unknown command '{}'", other),
    };
    Ok(command)
}

fn gateway(config: &Config) -> anyhow::Result<Gateway<HttpTransport>> {
    let key = config.require_api_key()?;
    Ok(Gateway::new(HttpTransport::new(config, key)))
}

fn print_course(course: &Course) {
    println!(
        "{BOLD}{}{RESET} ({}) MOS {}, {} lessons, {} hours, {}",
        course.title,
        course.id,
        course.mos,
        course.lessons().len(),
        course.total_duration(),
        course.status
    );
    for (idx, lesson) in course.lessons().iter().enumerate() {
        println!(
            "  {}. {} [{}] {}h",
            idx + 1,
            lesson.title,
            lesson.id,
            lesson.duration_hours
        );
    }
}

fn new_wizard(mos: String, topic: String) -> anyhow::Result<Wizard> {
    let mut wizard = Wizard::default();
    let form = wizard.form_mut()?;
    form.mos = mos;
    form.topic = topic;
    Ok(wizard)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "addie=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match parse_command(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{USAGE}");
            return Err(e);
        }
    };

    let config = Config::from_env().context("invalid configuration")?;
    let store = JsonFileStore::new(&config.store_dir, &config.store_key);
    let mut session = Session::load(store).context("failed to load saved courses")?;

    match command {
        Command::List => {
            for row in session.summaries() {
                println!(
                    "{}  {BOLD}{}{RESET}  MOS {}  {} lessons  {}h  {}",
                    row.id, row.title, row.mos, row.lesson_count, row.total_duration, row.status
                );
            }
            println!(
                "\n{} draft, {} accredited",
                session.count_with_status(CourseStatus::Draft),
                session.count_with_status(CourseStatus::Accredited)
            );
        }
        Command::New {
            mos,
            topic,
            hours,
            reference,
        } => {
            let mut wizard = new_wizard(mos, topic)?;
            wizard.form_mut()?.duration_hours = hours;
            if let Some(path) = reference {
                let text = load_reference_file(&path)?;
                wizard.set_reference_material(text)?;
            }
            wizard.next()?;
            wizard
                .generate_architecture(&gateway(&config)?)
                .context("failed to generate the course structure")?;
            let course = wizard.finalize()?;
            print_course(&course);
            session.add_course(course);
        }
        Command::Draft {
            mos,
            topic,
            lesson_hours,
        } => {
            let mut wizard = new_wizard(mos, topic)?;
            wizard.form_mut()?.duration_hours = lesson_hours.iter().sum();
            wizard.next()?;
            for hours in lesson_hours {
                wizard.add_manual_lesson(LessonDraft {
                    duration_hours: Some(hours),
                    ..Default::default()
                })?;
            }
            let course = wizard.finalize()?;
            print_course(&course);
            session.add_course(course);
        }
        Command::Develop {
            course_id,
            lesson_id,
        } => {
            session
                .develop_lesson(&gateway(&config)?, &course_id, &lesson_id)
                .context(format!("failed to develop lesson {}", lesson_id))?;
            println!("developed lesson {BOLD}{}{RESET}", lesson_id);
        }
        Command::Tests { course_id } => {
            session
                .generate_tests(&gateway(&config)?, &course_id)
                .context("failed to generate tests")?;
            let items = session
                .course(&course_id)
                .map(|c| c.course_tests.item_count())
                .unwrap_or_default();
            println!("generated {BOLD}{}{RESET} test items", items);
        }
        Command::Promote { course_id, status } => {
            session.promote(&course_id, status)?;
            println!("{} is now {BOLD}{}{RESET}", course_id, status);
        }
        Command::Render {
            course_id,
            document,
            lesson_id,
        } => {
            let course = session
                .course(&course_id)
                .context(format!("no course with id {}", course_id))?;
            let markdown = match document.as_str() {
                "poi" => render_poi(course).to_markdown()?,
                "tsp" => render_tsp(course).to_markdown()?,
                "plan" => {
                    let lesson_id = lesson_id.context("plan needs a lesson_id")?;
                    render_lesson_plan(course, &lesson_id)?.to_markdown()?
                }
                "slides" => {
                    let lesson_id = lesson_id.context("slides needs a lesson_id")?;
                    render_slides(course, &lesson_id)?.to_markdown()?
                }
                other => bail!("unknown document '{}', expected poi, tsp, plan or slides", other),
            };
            println!("{}", markdown);
        }
    }

    if session.flush().context("failed to save courses")? {
        eprintln!("saved to {}", session.store().path().display());
    }
    Ok(())
}
