//! Client for the Claude project/document API.
//!
//! Authentication rides on a browser session cookie captured during setup.
//! The push flow replaces the single tracked project document: find the
//! remote document by name, delete the stale copy, upload the new one and
//! remember its id for the next run.

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{
    ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE, COOKIE, SET_COOKIE, USER_AGENT,
};
use sandworm_core::ConfigStore;
use serde::Deserialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

const BASE_URL: &str = "https://api.claude.ai";

pub const SESSION_KEY: &str = "claude.session_key";
pub const ORGANIZATION_ID_KEY: &str = "claude.organization_id";
pub const PROJECT_ID_KEY: &str = "claude.project_id";
pub const DOCUMENT_ID_KEY: &str = "claude.document_id";

static SESSION_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sessionKey=([^;]+)").unwrap());

#[derive(Debug, Deserialize)]
pub struct Organization {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Project {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archived_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(rename = "uuid")]
    pub id: String,
    pub file_name: String,
}

/// Remote document-sync surface consumed by the push and purge commands.
pub trait SyncClient {
    /// Uploads `local_file` as `remote_name`, replacing any document
    /// previously uploaded under that name.
    fn upload(&mut self, local_file: &Path, remote_name: &str) -> Result<()>;
    fn list_documents(&mut self) -> Result<Vec<Document>>;
    fn delete_document(&mut self, id: &str) -> Result<()>;
}

pub struct ClaudeClient {
    config: ConfigStore,
    http: HttpClient,
}

impl ClaudeClient {
    pub fn new(config: ConfigStore) -> Result<Self> {
        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ClaudeClient { config, http })
    }

    /// Walks through the interactive setup, prompting only for values that
    /// are missing (or for everything when `force` is set). Returns false
    /// when setup cannot complete, e.g. no organizations exist yet.
    pub fn setup(&mut self, force: bool) -> Result<bool> {
        if force || !self.config.has(SESSION_KEY) {
            println!();
            println!(
                "Please go to https://claude.ai in your browser and copy your session key from the Cookie header."
            );
            println!("You can find this in your browser's developer tools under the Network tab.");
            let key = prompt_line("\nEnter your session key: ")?;
            if key.is_empty() {
                bail!("No session key provided");
            }
            self.config.set(SESSION_KEY, &key)?;
        }

        if force || !self.config.has(ORGANIZATION_ID_KEY) {
            let orgs = self.list_organizations()?;
            if orgs.is_empty() {
                println!("\nNo organizations found. Please create one at https://claude.ai");
                return Ok(false);
            }

            println!("\nSelect an organization for this project:");
            let org = select_from_list(&orgs, |o| &o.name)?;
            let id = org.id.clone();
            self.config.set(ORGANIZATION_ID_KEY, &id)?;
        }

        if force || !self.config.has(PROJECT_ID_KEY) {
            let projects = self.list_projects()?;
            let active: Vec<Project> = projects
                .into_iter()
                .filter(|p| p.archived_at.is_none())
                .collect();
            if active.is_empty() {
                println!("\nNo active projects found. Please create one at https://claude.ai");
                return Ok(false);
            }

            println!("\nSelect a project:");
            let project = select_from_list(&active, |p| &p.name)?;
            let id = project.id.clone();
            self.config.set(PROJECT_ID_KEY, &id)?;
        }

        Ok(true)
    }

    /// Deletes every document in the project, reporting progress through
    /// `progress(file_name, current, total)`. Returns the number of
    /// documents removed.
    pub fn purge_project_files(
        &mut self,
        mut progress: impl FnMut(&str, usize, usize),
    ) -> Result<usize> {
        self.validate_config()?;

        let docs = self.list_documents()?;
        let total = docs.len();
        for (i, doc) in docs.iter().enumerate() {
            progress(&doc.file_name, i + 1, total);
            if let Err(err) = self.delete_document(&doc.id) {
                if !is_not_found(&err) {
                    return Err(err);
                }
            }
        }

        self.config.delete(DOCUMENT_ID_KEY)?;
        Ok(total)
    }

    fn validate_config(&self) -> Result<()> {
        let missing: Vec<&str> = [SESSION_KEY, ORGANIZATION_ID_KEY, PROJECT_ID_KEY]
            .into_iter()
            .filter(|key| !self.config.has(key))
            .collect();
        if !missing.is_empty() {
            bail!("Missing required config keys: {}", missing.join(", "));
        }
        Ok(())
    }

    fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>> {
        let url = format!("{BASE_URL}/api{path}");
        log::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(
                USER_AGENT,
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:129.0) Gecko/20100101 Firefox/129.0",
            )
            // The API intermittently returns 403 under load unless the
            // client advertises exactly this encoding preference, so the
            // header is pinned and responses are decoded by hand below.
            .header(ACCEPT_ENCODING, "gzip;q=1.0, identity;q=0.3")
            .header(
                COOKIE,
                format!("sessionKey={}", self.config.get(SESSION_KEY).unwrap_or_default()),
            );
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().context("Request failed")?;
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let gzipped = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            == Some("gzip");

        let raw = response.bytes().context("Failed to read response body")?;
        let body_bytes = if gzipped {
            let mut decoder = GzDecoder::new(raw.as_ref());
            let mut decoded = Vec::new();
            decoder
                .read_to_end(&mut decoded)
                .context("Failed to decode gzip response")?;
            decoded
        } else {
            raw.to_vec()
        };

        if !status.is_success() {
            bail!(
                "API request failed: {} - {}",
                status.as_u16(),
                String::from_utf8_lossy(&body_bytes)
            );
        }

        // The service rotates the session key occasionally; keep the stored
        // copy current so the next invocation still authenticates.
        if let Some(cookie) = set_cookie {
            if let Some(caps) = SESSION_KEY_RE.captures(&cookie) {
                let new_key = &caps[1];
                if self.config.get(SESSION_KEY) != Some(new_key) {
                    log::debug!("Refreshing stored session key from Set-Cookie");
                    self.config.set(SESSION_KEY, new_key)?;
                }
            }
        }

        Ok(body_bytes)
    }

    fn list_organizations(&mut self) -> Result<Vec<Organization>> {
        let data = self.request(Method::GET, "/organizations", None)?;
        serde_json::from_slice(&data).context("Failed to parse organizations")
    }

    fn list_projects(&mut self) -> Result<Vec<Project>> {
        let path = format!(
            "/organizations/{}/projects",
            self.config.get(ORGANIZATION_ID_KEY).unwrap_or_default()
        );
        let data = self.request(Method::GET, &path, None)?;
        serde_json::from_slice(&data).context("Failed to parse projects")
    }

    fn upload_document(&mut self, file_name: &str, content: &str) -> Result<Document> {
        let path = format!(
            "/organizations/{}/projects/{}/docs",
            self.config.get(ORGANIZATION_ID_KEY).unwrap_or_default(),
            self.config.get(PROJECT_ID_KEY).unwrap_or_default()
        );
        let body = serde_json::json!({
            "file_name": file_name,
            "content": content,
        });
        let data = self.request(Method::POST, &path, Some(body))?;
        serde_json::from_slice(&data).context("Failed to parse document")
    }
}

impl SyncClient for ClaudeClient {
    fn upload(&mut self, local_file: &Path, remote_name: &str) -> Result<()> {
        self.validate_config()?;

        // Adopt an existing document with the same remote name, e.g. one
        // uploaded from another checkout of the same project.
        if !self.config.has(DOCUMENT_ID_KEY) {
            let docs = self.list_documents()?;
            if let Some(doc) = docs.into_iter().find(|d| d.file_name == remote_name) {
                self.config.set(DOCUMENT_ID_KEY, &doc.id)?;
            }
        }

        if let Some(id) = self.config.get(DOCUMENT_ID_KEY).map(str::to_string) {
            if let Err(err) = self.delete_document(&id) {
                if !is_not_found(&err) {
                    return Err(err);
                }
            }
            self.config.delete(DOCUMENT_ID_KEY)?;
        }

        let content = fs::read_to_string(local_file)
            .with_context(|| format!("Failed to read {}", local_file.display()))?;
        let doc = self.upload_document(remote_name, &content)?;
        self.config.set(DOCUMENT_ID_KEY, &doc.id)?;
        Ok(())
    }

    fn list_documents(&mut self) -> Result<Vec<Document>> {
        let path = format!(
            "/organizations/{}/projects/{}/docs",
            self.config.get(ORGANIZATION_ID_KEY).unwrap_or_default(),
            self.config.get(PROJECT_ID_KEY).unwrap_or_default()
        );
        let data = self.request(Method::GET, &path, None)?;
        serde_json::from_slice(&data).context("Failed to parse documents")
    }

    fn delete_document(&mut self, id: &str) -> Result<()> {
        let path = format!(
            "/organizations/{}/projects/{}/docs/{}",
            self.config.get(ORGANIZATION_ID_KEY).unwrap_or_default(),
            self.config.get(PROJECT_ID_KEY).unwrap_or_default(),
            id
        );
        self.request(Method::DELETE, &path, None)?;
        Ok(())
    }
}

/// A deleted-elsewhere document is not an error worth aborting for.
fn is_not_found(err: &anyhow::Error) -> bool {
    err.to_string().contains("API request failed: 404")
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

fn select_from_list<'a, T>(items: &'a [T], name: impl Fn(&T) -> &str) -> Result<&'a T> {
    for (i, item) in items.iter().enumerate() {
        println!("{}. {}", i + 1, name(item));
    }

    loop {
        let input = prompt_line("\nEnter selection number: ")?;
        match input.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(&items[n - 1]),
            Ok(_) | Err(_) => {
                println!(
                    "Invalid selection. Please enter a number between 1 and {}",
                    items.len()
                );
            }
        }
    }
}
