//! File-backed session storage.
//!
//! Sessions live one per line in a JSONL file, keyed by date. Readers take a
//! shared lock; writers take an exclusive lock on a sidecar `.lock` file for
//! the whole read-modify-write and replace the data file atomically, so two
//! planners racing on the same day cannot both persist a plan.
//!
//! Lines that fail to parse are skipped on read but written back verbatim,
//! after the sessions, so a rewrite never loses data it could not understand.

use crate::{Error, Result, Session, SessionRepository};
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default file name inside the data directory
pub const SESSIONS_FILE: &str = "sessions.jsonl";

/// JSONL session store with file locking
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default file name inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSIONS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Every stored session, oldest first
    pub fn load_all(&self) -> Result<Vec<Session>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let contents = read_sessions(&file);
        file.unlock()?;

        let mut sessions = contents?.sessions;
        sessions.sort_by_key(|s| s.date);
        tracing::debug!("Read {} sessions from {:?}", sessions.len(), self.path);
        Ok(sessions)
    }

    /// Insert `session`, replacing any stored session with the same date
    pub fn upsert(&self, session: &Session) -> Result<()> {
        self.update(session.date, |slot| {
            *slot = Some(session.clone());
            Ok(())
        })
        .map(|_| ())
    }

    /// Load the session for `date`, let `f` modify it, and save it back
    ///
    /// The slot is `None` when nothing is stored for `date`. Leaving it `None`
    /// removes the session. The whole cycle runs under the exclusive lock.
    pub fn update<F>(&self, date: NaiveDate, f: F) -> Result<Option<Session>>
    where
        F: FnOnce(&mut Option<Session>) -> Result<()>,
    {
        self.ensure_parent_dir()?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.update_locked(date, f);

        lock.unlock()?;
        result
    }

    fn update_locked<F>(&self, date: NaiveDate, f: F) -> Result<Option<Session>>
    where
        F: FnOnce(&mut Option<Session>) -> Result<()>,
    {
        let FileContents {
            mut sessions,
            unparsed,
        } = if self.path.exists() {
            read_sessions(&File::open(&self.path)?)?
        } else {
            FileContents::default()
        };

        let position = sessions.iter().position(|s| s.date == date);
        let mut slot = position.map(|i| sessions.remove(i));
        f(&mut slot)?;

        if let Some(session) = &slot {
            if session.date != date {
                return Err(Error::Store(format!(
                    "session for {} cannot be moved to {}",
                    date, session.date
                )));
            }
            sessions.push(session.clone());
        }
        sessions.sort_by_key(|s| s.date);

        self.write_all(&sessions, &unparsed)?;
        tracing::debug!("Stored {} sessions after updating {}", sessions.len(), date);
        Ok(slot)
    }

    /// Atomically replace the data file
    fn write_all(&self, sessions: &[Session], unparsed: &[String]) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            Error::Store(format!("session path {:?} has no parent", self.path))
        })?;
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            for session in sessions {
                let line = serde_json::to_string(session)?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            for line in unparsed {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

#[derive(Default)]
struct FileContents {
    sessions: Vec<Session>,
    /// Raw lines that did not parse, in file order
    unparsed: Vec<String>,
}

/// Parse JSONL sessions, setting aside lines that do not parse
fn read_sessions(file: &File) -> Result<FileContents> {
    let reader = BufReader::new(file);
    let mut contents = FileContents::default();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Session>(&line) {
            Ok(session) => contents.sessions.push(session),
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
                contents.unparsed.push(line);
            }
        }
    }

    Ok(contents)
}

impl SessionRepository for SessionStore {
    fn list(&self, since: NaiveDate) -> Result<Vec<Session>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|s| s.date >= since)
            .collect())
    }

    fn get(&self, date: NaiveDate) -> Result<Option<Session>> {
        Ok(self.load_all()?.into_iter().find(|s| s.date == date))
    }
}
