//! Site information lookup.

use async_trait::async_trait;

use crate::config::SiteConfig;
use crate::error::{AppError, AppResult};
use crate::models::{SiteGeneral, SiteSeo};

/// Source of the site settings needed to build absolute links
#[async_trait]
pub trait SiteInfoProvider: Send + Sync {
    async fn site_general(&self) -> AppResult<SiteGeneral>;

    async fn site_seo(&self) -> AppResult<SiteSeo>;
}

/// Site info served from the `[site]` configuration section
#[derive(Debug, Clone)]
pub struct StaticSiteInfo {
    general: SiteGeneral,
    seo: SiteSeo,
}

impl StaticSiteInfo {
    pub fn new(general: SiteGeneral, seo: SiteSeo) -> Self {
        Self { general, seo }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            SiteGeneral {
                site_url: config.url.clone(),
            },
            SiteSeo {
                permalink: config.permalink,
            },
        )
    }
}

#[async_trait]
impl SiteInfoProvider for StaticSiteInfo {
    async fn site_general(&self) -> AppResult<SiteGeneral> {
        if self.general.site_url.trim().is_empty() {
            return Err(AppError::SiteInfo {
                message: "site url is not configured".to_string(),
            });
        }
        Ok(self.general.clone())
    }

    async fn site_seo(&self) -> AppResult<SiteSeo> {
        Ok(self.seo.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermalinkStyle;

    #[tokio::test]
    async fn test_static_site_info_from_config() {
        let config = SiteConfig {
            url: "https://forum.example.com".to_string(),
            permalink: PermalinkStyle::QuestionId,
        };
        let info = StaticSiteInfo::from_config(&config);

        assert_eq!(
            info.site_general().await.unwrap().site_url,
            "https://forum.example.com"
        );
        assert_eq!(
            info.site_seo().await.unwrap().permalink,
            PermalinkStyle::QuestionId
        );
    }

    #[tokio::test]
    async fn test_empty_site_url_is_an_error() {
        let info = StaticSiteInfo::new(
            SiteGeneral {
                site_url: String::new(),
            },
            SiteSeo::default(),
        );
        assert!(matches!(
            info.site_general().await,
            Err(AppError::SiteInfo { .. })
        ));
    }
}
