//! Job application tracker persisted as a JSON list

use crate::error::{Result, ResumeFitError};
use chrono::{Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(status: &str) -> std::result::Result<Self, String> {
        match status.trim().to_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "interviewing" | "interview" => Ok(ApplicationStatus::Interviewing),
            "offer" => Ok(ApplicationStatus::Offer),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!(
                "Invalid application status: {}. Supported: applied, interviewing, offer, rejected",
                status
            )),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedApplication {
    pub id: u32,
    pub company: String,
    pub position: String,
    pub date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
}

/// Fields for a new entry. `date` defaults to today, `status` to `Applied`.
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    pub date: Option<NaiveDate>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

/// Applications loaded from and written back to a single JSON file.
/// Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct JobTracker {
    path: PathBuf,
    applications: Vec<TrackedApplication>,
}

impl JobTracker {
    /// A missing file is an empty tracker.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let applications = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    ResumeFitError::Tracker(format!("Failed to read {}: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        debug!("Loaded {} tracked applications from {}", applications.len(), path.display());
        Ok(Self { path, applications })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[TrackedApplication] {
        &self.applications
    }

    pub fn get(&self, id: u32) -> Option<&TrackedApplication> {
        self.applications.iter().find(|app| app.id == id)
    }

    pub fn add(&mut self, new: NewApplication) -> Result<&TrackedApplication> {
        if new.company.trim().is_empty() || new.position.trim().is_empty() {
            return Err(ResumeFitError::Tracker(
                "Company and position are required".to_string(),
            ));
        }

        let id = self
            .applications
            .iter()
            .map(|app| app.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| ResumeFitError::Tracker("No application ids left".to_string()))?;

        let mut applications = self.applications.clone();
        applications.push(TrackedApplication {
            id,
            company: new.company.trim().to_string(),
            position: new.position.trim().to_string(),
            date: new.date.unwrap_or_else(|| Local::now().date_naive()),
            status: new.status.unwrap_or(ApplicationStatus::Applied),
            notes: new.notes.unwrap_or_default(),
        });
        self.commit(applications)?;

        let index = self.applications.len() - 1;
        Ok(&self.applications[index])
    }

    pub fn update_status(&mut self, id: u32, status: ApplicationStatus) -> Result<()> {
        let mut applications = self.applications.clone();
        find_mut(&mut applications, id)?.status = status;
        self.commit(applications)
    }

    pub fn update_notes(&mut self, id: u32, notes: impl Into<String>) -> Result<()> {
        let mut applications = self.applications.clone();
        find_mut(&mut applications, id)?.notes = notes.into();
        self.commit(applications)
    }

    pub fn remove(&mut self, id: u32) -> Result<TrackedApplication> {
        let index = self
            .applications
            .iter()
            .position(|app| app.id == id)
            .ok_or_else(|| not_found(id))?;
        let mut applications = self.applications.clone();
        let removed = applications.remove(index);
        self.commit(applications)?;
        Ok(removed)
    }

    /// Write `applications` and only then adopt them, so a failed write
    /// leaves the tracker matching the file.
    fn commit(&mut self, applications: Vec<TrackedApplication>) -> Result<()> {
        write_all(&self.path, &applications)?;
        self.applications = applications;
        Ok(())
    }
}

fn find_mut(applications: &mut [TrackedApplication], id: u32) -> Result<&mut TrackedApplication> {
    applications
        .iter_mut()
        .find(|app| app.id == id)
        .ok_or_else(|| not_found(id))
}

fn write_all(path: &Path, applications: &[TrackedApplication]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(applications)?;
    fs::write(path, content)?;
    debug!("Saved {} tracked applications", applications.len());
    Ok(())
}

fn not_found(id: u32) -> ResumeFitError {
    ResumeFitError::Tracker(format!("No application with id {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn application(company: &str, position: &str) -> NewApplication {
        NewApplication {
            company: company.to_string(),
            position: position.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let tracker = JobTracker::load(dir.path().join("apps.json")).unwrap();
        assert!(tracker.list().is_empty());
    }

    #[test]
    fn test_add_assigns_increasing_ids_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("apps.json");

        let mut tracker = JobTracker::load(&path).unwrap();
        assert_eq!(tracker.add(application("Acme", "QA Lead")).unwrap().id, 1);
        assert_eq!(tracker.add(application("Globex", "Auditor")).unwrap().id, 2);

        let reloaded = JobTracker::load(&path).unwrap();
        assert_eq!(reloaded.list().len(), 2);
        let first = reloaded.get(1).unwrap();
        assert_eq!(first.company, "Acme");
        assert_eq!(first.status, ApplicationStatus::Applied);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_id_is_max_plus_one_after_removal() {
        let dir = TempDir::new().unwrap();
        let mut tracker = JobTracker::load(dir.path().join("apps.json")).unwrap();
        tracker.add(application("Acme", "QA Lead")).unwrap();
        tracker.add(application("Globex", "Auditor")).unwrap();
        tracker.remove(1).unwrap();

        assert_eq!(tracker.add(application("Initech", "Engineer")).unwrap().id, 3);
    }

    #[test]
    fn test_date_defaults_to_today() {
        let dir = TempDir::new().unwrap();
        let mut tracker = JobTracker::load(dir.path().join("apps.json")).unwrap();
        let added = tracker
            .add(NewApplication {
                company: "Acme".to_string(),
                position: "QA Lead".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(added.date, Local::now().date_naive());
    }

    #[test]
    fn test_update_status_and_notes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        let mut tracker = JobTracker::load(&path).unwrap();
        tracker.add(application("Acme", "QA Lead")).unwrap();

        tracker.update_status(1, ApplicationStatus::Interviewing).unwrap();
        tracker.update_notes(1, "Panel interview on Friday").unwrap();

        let reloaded = JobTracker::load(&path).unwrap();
        let app = reloaded.get(1).unwrap();
        assert_eq!(app.status, ApplicationStatus::Interviewing);
        assert_eq!(app.notes, "Panel interview on Friday");
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut tracker = JobTracker::load(dir.path().join("apps.json")).unwrap();
        assert!(matches!(
            tracker.update_status(7, ApplicationStatus::Offer),
            Err(ResumeFitError::Tracker(_))
        ));
        assert!(tracker.remove(7).is_err());
    }

    #[test]
    fn test_add_requires_company_and_position() {
        let dir = TempDir::new().unwrap();
        let mut tracker = JobTracker::load(dir.path().join("apps.json")).unwrap();
        assert!(tracker.add(application("  ", "QA Lead")).is_err());
        assert!(tracker.list().is_empty());
    }

    #[test]
    fn test_id_overflow_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        let existing = vec![TrackedApplication {
            id: u32::MAX,
            company: "Acme".to_string(),
            position: "QA Lead".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: ApplicationStatus::Applied,
            notes: String::new(),
        }];
        fs::write(&path, serde_json::to_string(&existing).unwrap()).unwrap();

        let mut tracker = JobTracker::load(&path).unwrap();
        assert!(matches!(
            tracker.add(application("Globex", "Auditor")),
            Err(ResumeFitError::Tracker(_))
        ));
        assert_eq!(tracker.list(), existing.as_slice());
    }

    #[test]
    fn test_failed_write_leaves_tracker_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        let mut tracker = JobTracker::load(&path).unwrap();
        tracker.add(application("Acme", "QA Lead")).unwrap();

        // a directory in place of the file makes every write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(tracker.add(application("Globex", "Auditor")).is_err());
        assert_eq!(tracker.list().len(), 1);

        assert!(tracker.update_status(1, ApplicationStatus::Offer).is_err());
        assert_eq!(tracker.get(1).unwrap().status, ApplicationStatus::Applied);

        assert!(tracker.update_notes(1, "Call back Monday").is_err());
        assert!(tracker.get(1).unwrap().notes.is_empty());

        assert!(tracker.remove(1).is_err());
        assert_eq!(tracker.list().len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(JobTracker::load(&path), Err(ResumeFitError::Tracker(_))));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ApplicationStatus::parse("Offer"), Ok(ApplicationStatus::Offer));
        assert_eq!(ApplicationStatus::parse("interview"), Ok(ApplicationStatus::Interviewing));
        assert!(ApplicationStatus::parse("ghosted").is_err());
    }
}
