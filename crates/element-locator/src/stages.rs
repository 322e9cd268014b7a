//! Ordered resolution stages
//!
//! Each stage is an independent probe pass over the live page; the engine
//! short-circuits on the first stage that yields any match. Probe errors
//! and timeouts read as "no match" and fall through to the next stage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use page_adapter::{ElementRef, PageDriver, Probe};

use crate::types::{slugify, LocatorQuery};
use crate::variants::text_variants;

/// One heuristic technique for turning a description into matches.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, driver: &Arc<dyn PageDriver>, query: &LocatorQuery)
        -> Vec<ElementRef>;
}

/// The full pipeline in resolution order.
pub fn stage_pipeline() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(RoleStage),
        Box::new(TextStage),
        Box::new(LabelStage),
        Box::new(AttributeStage::substring("placeholder", "placeholder")),
        Box::new(AttributeStage::substring("name-attr", "name")),
        Box::new(IdStage),
        Box::new(TitleStage),
        Box::new(StructuralStage),
    ]
}

async fn run_probe(
    driver: &Arc<dyn PageDriver>,
    query: &LocatorQuery,
    probe: Probe,
) -> Vec<ElementRef> {
    match driver.query(&probe, query.timeout).await {
        Ok(matches) => matches,
        Err(err) => {
            debug!("probe {} failed: {}", probe, err);
            Vec::new()
        }
    }
}

/// Stage 1: explicit accessibility-role match, only with a role hint.
struct RoleStage;

#[async_trait]
impl Stage for RoleStage {
    fn name(&self) -> &'static str {
        "role"
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        let role = match &query.role {
            Some(role) => role.clone(),
            None => return Vec::new(),
        };
        let probe = Probe::role(role, query.effective_name());
        run_probe(driver, query, probe).await
    }
}

/// Stage 2: visible text, exact first then substring, over all variants.
struct TextStage;

#[async_trait]
impl Stage for TextStage {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        let patterns = text_variants(&query.description);
        for exact in [true, false] {
            for pattern in &patterns {
                let probe = Probe::text(pattern.clone(), exact);
                let matches = run_probe(driver, query, probe).await;
                if !matches.is_empty() {
                    return matches;
                }
            }
        }
        Vec::new()
    }
}

/// Stage 3: associated label, over the same variants.
struct LabelStage;

#[async_trait]
impl Stage for LabelStage {
    fn name(&self) -> &'static str {
        "label"
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        for pattern in text_variants(&query.description) {
            let matches = run_probe(driver, query, Probe::label(pattern)).await;
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }
}

/// Stages 4/5: attribute substring of the raw description.
struct AttributeStage {
    stage_name: &'static str,
    attribute: &'static str,
}

impl AttributeStage {
    fn substring(stage_name: &'static str, attribute: &'static str) -> Self {
        Self {
            stage_name,
            attribute,
        }
    }
}

#[async_trait]
impl Stage for AttributeStage {
    fn name(&self) -> &'static str {
        self.stage_name
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        let probe = Probe::attribute(self.attribute, query.description.clone(), false);
        run_probe(driver, query, probe).await
    }
}

/// Stage 6: id attribute, slugified description, exact then substring.
struct IdStage;

#[async_trait]
impl Stage for IdStage {
    fn name(&self) -> &'static str {
        "id"
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        let slug = slugify(&query.description);
        if slug.is_empty() {
            return Vec::new();
        }
        for exact in [true, false] {
            let probe = Probe::attribute("id", slug.clone(), exact);
            let matches = run_probe(driver, query, probe).await;
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }
}

/// Stage 7: title / aria-label substring.
struct TitleStage;

#[async_trait]
impl Stage for TitleStage {
    fn name(&self) -> &'static str {
        "title"
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        for attribute in ["title", "aria-label"] {
            let probe = Probe::attribute(attribute, query.description.clone(), false);
            let matches = run_probe(driver, query, probe).await;
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }
}

/// Keyword-triggered selector templates for stage 8.
const STRUCTURAL_TEMPLATES: &[(&[&str], &[&str])] = &[
    (
        &["button", "버튼", "생성", "저장", "삭제", "취소", "submit"],
        &["button", "[type=submit]", "[role=button]", ".btn"],
    ),
    (
        &[
            "입력", "필드", "input", "field", "email", "password", "이메일", "비밀번호",
        ],
        &[
            "input",
            "textarea",
            "[type=text]",
            "[type=email]",
            "[type=password]",
        ],
    ),
    (
        &["링크", "메뉴", "link", "menu"],
        &["[role=menuitem]", "a"],
    ),
    (
        &["테이블", "목록", "리스트", "table", "list"],
        &["table", "[role=grid]", "ul", "ol"],
    ),
];

/// Stage 8: structural-pattern match.
struct StructuralStage;

#[async_trait]
impl Stage for StructuralStage {
    fn name(&self) -> &'static str {
        "structural"
    }

    async fn resolve(
        &self,
        driver: &Arc<dyn PageDriver>,
        query: &LocatorQuery,
    ) -> Vec<ElementRef> {
        let lower = query.description.to_lowercase();
        for (keywords, selectors) in STRUCTURAL_TEMPLATES {
            if !keywords.iter().any(|k| lower.contains(k)) {
                continue;
            }
            for selector in *selectors {
                let matches = run_probe(driver, query, Probe::selector(*selector)).await;
                if !matches.is_empty() {
                    debug!("structural template {} matched", selector);
                    return matches;
                }
            }
        }
        Vec::new()
    }
}
