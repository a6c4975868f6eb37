//! One-shot subcommands: single tones and the session history.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use pt_audio::{AudioOutput, CpalOutput};
use pt_formats::{write_wav, HistoryStore};
use pt_model::SessionRecord;
use pt_synth::{estimate_frequency, synthesize_named};

/// Render `name`, report its measured pitch, then play it or save it.
pub fn tone(name: &str, wav: Option<&Path>) -> Result<()> {
    let clip = synthesize_named(name)?;
    let measured = estimate_frequency(clip.channel(0), clip.sample_rate()).unwrap_or(0.0);
    println!(
        "{}: {} frames at {} Hz, measured {:.2} Hz",
        name.trim(),
        clip.frames(),
        clip.sample_rate(),
        measured
    );

    match wav {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_wav(&mut writer, &clip)
                .and_then(|()| writer.flush())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            let mut output = CpalOutput::open()?;
            output.start()?;
            output.play_clip(&clip)?;
            // Let the queue drain before the stream is dropped.
            std::thread::sleep(clip.duration() + Duration::from_millis(300));
            output.stop()?;
        }
    }
    Ok(())
}

/// Print every stored session, oldest first, with an overall score.
pub fn history(store: &HistoryStore) -> Result<()> {
    let sessions = store.load()?;
    if sessions.is_empty() {
        println!("No sessions recorded in {}.", store.path().display());
        return Ok(());
    }

    for (i, session) in sessions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, format_session(session));
    }

    let (correct, total) = sessions.iter().fold((0, 0), |(c, t), s| {
        let summary = s.summary();
        (c + summary.correct, t + summary.total)
    });
    if total > 0 {
        println!(
            "Overall: {}/{} correct ({:.0}%)",
            correct,
            total,
            100.0 * correct as f64 / total as f64
        );
    }
    Ok(())
}

fn format_session(session: &SessionRecord) -> String {
    let summary = session.summary();
    let answers: Vec<String> = session
        .results
        .iter()
        .map(|r| {
            if r.correct {
                r.target.to_string()
            } else {
                format!("{}→{}", r.guess, r.target)
            }
        })
        .collect();
    format!(
        "{}  {}/{}  [{}]",
        session.timestamp,
        summary.correct,
        summary.total,
        answers.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_model::{CadenceType, Guess, Note, RoundResult, Tonality};

    #[test]
    fn session_line_marks_misses() {
        let rounds = [
            RoundResult::resolve(
                CadenceType::Dominant,
                Tonality::new(Note::C),
                Note::E,
                Guess::parse("e"),
                Duration::from_millis(900),
            ),
            RoundResult::resolve(
                CadenceType::Dominant,
                Tonality::new(Note::C),
                Note::A,
                Guess::NoAnswer,
                Duration::from_millis(3100),
            ),
        ];
        let record = SessionRecord::new("2024-05-01T09:00:00+02:00", &rounds);
        assert_eq!(
            format_session(&record),
            "2024-05-01T09:00:00+02:00  1/2  [E ?→A]"
        );
    }

    #[test]
    fn tone_writes_wav_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        tone("A", Some(&path)).unwrap();
        let clip = pt_formats::load_wav(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(clip.frames(), 8820);
    }

    #[test]
    fn tone_rejects_unknown_note() {
        let dir = tempfile::tempdir().unwrap();
        assert!(tone("H", Some(&dir.path().join("h.wav"))).is_err());
    }
}
