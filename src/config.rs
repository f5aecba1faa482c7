use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::job::Job;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Client-wide `User-Agent`. Job headers still win.
    pub user_agent: Option<String>,
    #[serde(rename = "job")]
    pub jobs: Vec<Job>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: None,
            jobs: crate::sites::presets(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for job in &self.jobs {
            if !names.insert(job.name.as_str()) {
                return Err(Error::InvalidJob {
                    job: job.name.clone(),
                    reason: "defined more than once".to_string(),
                });
            }
            job.validate()?;
        }
        Ok(())
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use crate::response::DecodeMode;

    #[test]
    fn empty_file_uses_presets() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.user_agent.is_none());
        assert!(config.job("icve-pages").is_some());
        config.validate().unwrap();
    }

    #[test]
    fn jobs_from_file() {
        let config: Config = toml::from_str(
            r#"
            user_agent = "snag-test"

            [[job]]
            name = "home"
            address = "https://www.eastmoney.com/"
            encoding = "utf-8"
            preview = 100
            destination = "caifu.html"

            [[job]]
            name = "courses"
            address = "https://zyk.icve.com.cn/prod-api/website/course/list"
            mode = "structured"
            query = { sort = "create_time", pageSize = "15" }
            listing = { field = "rows", columns = [{ label = "Course Name", key = "name" }] }
            pages = { param = "pageNum", last = 3 }
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("snag-test"));
        assert_eq!(config.jobs.len(), 2);

        let home = config.job("home").unwrap();
        assert_eq!(home.request.method, Method::Get);
        assert_eq!(home.mode, DecodeMode::Text);
        assert_eq!(home.preview, Some(100));

        let courses = config.job("courses").unwrap();
        assert_eq!(courses.pages.as_ref().map(|p| (p.first, p.last)), Some((1, 3)));
        assert!(config.job("missing").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let config: Config = toml::from_str(
            r#"
            [[job]]
            name = "a"
            address = "http://x/"

            [[job]]
            name = "a"
            address = "http://y/"
            "#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(Error::InvalidJob { .. })));
    }

    #[test]
    fn example_file_is_valid() {
        let config: Config = toml::from_str(include_str!("../snag.example.toml")).unwrap();
        config.validate().unwrap();

        assert_eq!(config.jobs.len(), 5);
        let kfc = config.job("kfc-guangzhou").unwrap();
        assert_eq!(kfc.request.method, Method::Post);
        assert_eq!(kfc.listing.as_ref().map(|l| l.field.as_str()), Some("Table1"));
        assert_eq!(config.job("cpta-titles").unwrap().queries.len(), 2);
    }
}
