//! Interactive line-based session.
//!
//! Reads one command per line from stdin and applies it to a
//! [`WorkoutSession`]. Days and exercises are addressed by the 1-based
//! numbers shown by `show`; exercise identities stay internal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use gymgenius_core::generate::{GenerateRequest, RoutineGenerator, generate_workout};
use gymgenius_core::routine::ExerciseId;
use gymgenius_core::session::{MSG_NOTHING_TO_EXPORT, MSG_RESET};
use gymgenius_core::{Completion, FieldEdit, WorkoutSession};

use crate::export_cmd;
use crate::render::render_workout;

const HELP: &str = "\
Comandos:
  show                          mostrar la rutina
  add <dia>                     añadir un ejercicio al día
  del <dia> <ej>                eliminar un ejercicio
  name <dia> <ej> <texto>       cambiar el nombre
  sets <dia> <ej> <n>           cambiar el número de series
  reps <dia> <ej> <texto>       cambiar las repeticiones
  toggle <dia> <ej> <serie>     marcar/desmarcar una serie
  reset                         volver a la rutina generada
  generate                      generar una rutina nueva (una línea vacía cancela)
  export [directorio]           exportar a CSV
  help                          esta ayuda
  quit                          salir";

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Show,
    Add { day: usize },
    Delete { day: usize, exercise: usize },
    Edit { day: usize, exercise: usize, edit: FieldEdit },
    Toggle { day: usize, exercise: usize, set: usize },
    Reset,
    Generate,
    Export { dir: Option<PathBuf> },
    Help,
    Quit,
}

/// Parse one input line. Numbers are 1-based.
pub fn parse_command(line: &str) -> Result<SessionCommand> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        bail!("comando vacío");
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb, rest.as_slice()) {
        ("show" | "ls", []) => SessionCommand::Show,
        ("add", [day]) => SessionCommand::Add {
            day: index(day)?,
        },
        ("del" | "rm", [day, ex]) => SessionCommand::Delete {
            day: index(day)?,
            exercise: index(ex)?,
        },
        ("name", [day, ex, text @ ..]) if !text.is_empty() => SessionCommand::Edit {
            day: index(day)?,
            exercise: index(ex)?,
            edit: FieldEdit::Name(text.join(" ")),
        },
        ("sets", [day, ex, n]) => SessionCommand::Edit {
            day: index(day)?,
            exercise: index(ex)?,
            edit: FieldEdit::Sets(
                n.parse()
                    .with_context(|| format!("número de series no válido: {n:?}"))?,
            ),
        },
        ("reps", [day, ex, text @ ..]) if !text.is_empty() => SessionCommand::Edit {
            day: index(day)?,
            exercise: index(ex)?,
            edit: FieldEdit::RepRange(text.join(" ")),
        },
        ("toggle" | "t", [day, ex, set]) => SessionCommand::Toggle {
            day: index(day)?,
            exercise: index(ex)?,
            set: index(set)?,
        },
        ("reset", []) => SessionCommand::Reset,
        ("generate" | "gen", []) => SessionCommand::Generate,
        ("export", []) => SessionCommand::Export { dir: None },
        ("export", [dir]) => SessionCommand::Export {
            dir: Some(PathBuf::from(dir)),
        },
        ("help" | "?", []) => SessionCommand::Help,
        ("quit" | "exit" | "q", []) => SessionCommand::Quit,
        _ => bail!("comando no reconocido: {line:?} (escribe `help`)"),
    };
    Ok(command)
}

/// Convert a 1-based user number into a 0-based index.
fn index(word: &str) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => bail!("se esperaba un número desde 1: {word:?}"),
    }
}

/// Resolve day/exercise positions to the day label and exercise identity.
fn locate(session: &WorkoutSession, day: usize, exercise: usize) -> Option<(String, ExerciseId)> {
    let d = session.plan()?.days().get(day)?;
    let ex = d.exercises.get(exercise)?;
    Some((d.label.clone(), ex.id()))
}

fn day_label(session: &WorkoutSession, day: usize) -> Option<String> {
    Some(session.plan()?.days().get(day)?.label.clone())
}

/// Settings the session loop needs from the caller.
pub struct SessionOptions<'a> {
    pub generator: &'a dyn RoutineGenerator,
    pub request: GenerateRequest,
    pub export_dir: &'a Path,
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run_session(mut session: WorkoutSession, options: SessionOptions<'_>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if session.workout().is_none() {
        generate(&mut session, &options, &mut lines).await?;
    }
    if let Some(workout) = session.workout() {
        print!("{}", render_workout(workout));
    }
    println!("Escribe `help` para ver los comandos.");

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        apply(&mut session, command, &options, &mut lines).await?;
    }
    Ok(())
}

async fn apply(
    session: &mut WorkoutSession,
    command: SessionCommand,
    options: &SessionOptions<'_>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    let changed = match command {
        SessionCommand::Show => true,
        SessionCommand::Help => {
            println!("{HELP}");
            false
        }
        SessionCommand::Quit => false,
        SessionCommand::Add { day } => match day_label(session, day) {
            Some(label) => session.add_exercise(&label).is_some(),
            None => not_found(),
        },
        SessionCommand::Delete { day, exercise } => match locate(session, day, exercise) {
            Some((label, id)) => session.delete_exercise(&label, id),
            None => not_found(),
        },
        SessionCommand::Edit {
            day,
            exercise,
            edit,
        } => match locate(session, day, exercise) {
            Some((label, id)) => session.edit_field(&label, id, edit),
            None => not_found(),
        },
        SessionCommand::Toggle { day, exercise, set } => match locate(session, day, exercise) {
            Some((_, id)) if session.toggle_set(id, set) => true,
            _ => not_found(),
        },
        SessionCommand::Reset => {
            if session.reset() {
                println!("{MSG_RESET}");
                true
            } else {
                println!("No hay rutina generada para restaurar.");
                false
            }
        }
        SessionCommand::Generate => generate(session, options, lines).await?,
        SessionCommand::Export { dir } => {
            match session.export() {
                Ok(sheets) => {
                    let dir = dir.as_deref().unwrap_or(options.export_dir);
                    let paths = export_cmd::write_sheets(&sheets, dir)?;
                    for path in &paths {
                        println!("Exportado: {}", path.display());
                    }
                }
                Err(_) => println!("{MSG_NOTHING_TO_EXPORT}"),
            }
            false
        }
    };

    if changed {
        if let Some(workout) = session.workout() {
            print!("{}", render_workout(workout));
        }
    }
    Ok(())
}

fn not_found() -> bool {
    println!("No existe ese día, ejercicio o serie.");
    false
}

/// Request a new routine. A line typed while waiting abandons the request.
async fn generate(
    session: &mut WorkoutSession,
    options: &SessionOptions<'_>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<bool> {
    let Some(ticket) = session.begin_generation() else {
        println!("Ya hay una generación en curso.");
        return Ok(false);
    };
    println!("Generando rutina... (pulsa Enter para cancelar)");

    let result = tokio::select! {
        result = generate_workout(options.generator, &options.request) => result,
        Ok(Some(_)) = lines.next_line() => {
            session.abandon_generation();
            println!("Generación cancelada.");
            return Ok(false);
        }
    };

    match session.complete_generation(ticket, result) {
        Completion::Applied => {
            println!("¡Rutina generada!");
            Ok(true)
        }
        Completion::Failed(message) => {
            println!("Falló la generación: {message}");
            Ok(false)
        }
        Completion::Stale | Completion::Busy => Ok(false),
    }
}
