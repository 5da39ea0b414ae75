use std::io::{self, BufRead, BufReader};
use std::{env, fs::File, path::Path};

use anyhow::Context;
use lesson_player::{
    lesson::{fetch_lesson, read_lesson, Interaction},
    Answer, Completion, EngineConfig, Host, Lesson, LessonEngine, Step,
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const USAGE: &str = "Usage: play_lesson <lesson.json|lesson.yaml|url> [script]";

pub struct Config {
    pub source: String,
    pub script: Option<String>,
}

impl Config {
    pub fn new(source: String, script: Option<String>) -> Self {
        Self { source, script }
    }
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let source = args
        .next()
        .context("a lesson file or URL is required")?;
    let script = args.next();

    Ok(Config::new(source, script))
}

struct ConsoleHost;

impl Host for ConsoleHost {
    fn celebrate(&mut self) {
        println!("{BOLD}*** confetti ***{RESET}");
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        println!("fullscreen {}", if enabled { "on" } else { "off" });
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    let lesson = load(&config.source).context(format!("failed to load lesson {}", config.source))?;
    let engine_config = EngineConfig::from_env().context("invalid engine configuration")?;

    let input: Box<dyn BufRead> = match &config.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).context(format!("failed to open script {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    println!(
        "playing {BOLD}{}{RESET} ({} slides)",
        lesson.title,
        lesson.slides.len()
    );
    play(&lesson, engine_config, input)
}

fn load(source: &str) -> anyhow::Result<Lesson> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_lesson(source)
    } else {
        read_lesson(Path::new(source))
    }
}

fn play(lesson: &Lesson, config: EngineConfig, input: Box<dyn BufRead>) -> anyhow::Result<()> {
    let mut finished = false;
    let mut engine = LessonEngine::new(&lesson.slides, ConsoleHost, || finished = true)
        .context("lesson cannot be played")?
        .with_config(config);
    let mut now_ms: u64 = 0;

    print_status(&engine);

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let (command, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));

        match command {
            "" => continue,
            "answer" => {
                let answer: Answer = serde_json::from_str(rest).context("answer must be JSON")?;
                let identity = engine.current_identity().clone();
                if let Err(e) = engine.set_answer(&identity, answer) {
                    eprintln!("{}", e);
                }
            }
            "check" => match engine.submit(now_ms) {
                Ok(correct) => println!("correct: {}", correct),
                Err(e) => eprintln!("{}", e),
            },
            "next" => {
                if engine.next(now_ms) == Step::Blocked {
                    println!("blocked");
                }
            }
            "prev" => {
                engine.previous();
            }
            "complete" => match engine.complete(now_ms) {
                Completion::Completed => println!("{BOLD}lesson complete{RESET}"),
                Completion::Blocked { message, .. } => println!("{}", message),
            },
            "wait" => {
                let ms: u64 = rest.trim().parse().context("wait takes milliseconds")?;
                let until = now_ms.saturating_add(ms);
                while let Some(deadline) = engine.next_deadline().filter(|d| *d <= until) {
                    now_ms = now_ms.max(deadline);
                    engine.tick(now_ms);
                }
                now_ms = until;
            }
            "fullscreen" => {
                engine.toggle_fullscreen();
            }
            "status" => {}
            "quit" => break,
            other => eprintln!("unknown command '{}'", other),
        }

        print_status(&engine);
    }

    engine.dispose();
    drop(engine);

    if finished {
        println!("finished {BOLD}{}{RESET}", lesson.title);
    }
    Ok(())
}

fn print_status<H: Host>(engine: &LessonEngine<'_, H>) {
    let identity = engine.current_identity();
    print!(
        "[{}/{} {:.0}%] {}",
        engine.current_slide_index() + 1,
        engine.slide_count(),
        engine.progress_percent(),
        identity
    );

    if let Some(instruction) = engine
        .current_slide()
        .interaction()
        .map(Interaction::instruction)
        .filter(|text| !text.is_empty())
    {
        print!(" ({})", instruction);
    }

    match engine.validation_result(identity) {
        Some(result) if engine.is_feedback_visible(identity) => {
            println!(" {BOLD}{:?}{RESET}: {}", result.severity, result.message)
        }
        _ => println!(),
    }
}
