use nexus_fetcher::{contents, resolver, ContentFetcher, FetchOutcome};
use nexus_protocol::{ActivityMetadata, ActivityStub, LocateWarning};

/// A resolved activity together with the stub that referenced it.
#[derive(Debug, Clone)]
pub struct LocatedActivity {
    pub stub: ActivityStub,
    pub metadata: ActivityMetadata,
}

#[derive(Debug, Clone)]
pub enum LocateResult {
    Found(Box<LocatedActivity>),
    Exhausted(LocateWarning),
}

/// Fetch one activity's metadata file, trying `src/<path>` first and
/// falling back to `assets/<path>`.
///
/// The first candidate that yields usable metadata wins. If both fail the
/// activity is dropped from the output; the drop is surfaced as a
/// [`LocateWarning`] so broken activity references show up in the report
/// instead of vanishing.
pub async fn locate_activity(fetcher: &dyn ContentFetcher, stub: &ActivityStub) -> LocateResult {
    let base = stub.app_git_url.clone().unwrap_or_default();
    let candidates = [
        format!("{}src/{}", base, stub.path),
        format!("{}assets/{}", base, stub.path),
    ];

    for url in &candidates {
        if let Some(mut metadata) = try_candidate(fetcher, url).await {
            metadata.visible = Some(stub.is_visible());
            metadata.app_name = stub.app_name.clone();
            metadata.app_git_url = stub.app_git_url.clone();
            return LocateResult::Found(Box::new(LocatedActivity {
                stub: stub.clone(),
                metadata,
            }));
        }
    }

    log::warn!(
        "no metadata found for activity {} (tried {} and {})",
        stub.path,
        candidates[0],
        candidates[1]
    );
    LocateResult::Exhausted(LocateWarning {
        path: stub.path.clone(),
        attempted: candidates.to_vec(),
    })
}

async fn try_candidate(fetcher: &dyn ContentFetcher, url: &str) -> Option<ActivityMetadata> {
    let envelope = match fetcher.fetch_contents(url).await {
        FetchOutcome::Success(envelope) => envelope,
        FetchOutcome::Failure(failure) => {
            log::debug!("candidate {url} failed: {}", failure.message);
            return None;
        }
    };

    let text = match contents::decode_text(url, &envelope) {
        Ok(text) => text,
        Err(failure) => {
            log::debug!("candidate {url} not decodable: {}", failure.message);
            return None;
        }
    };

    let mut metadata = match contents::parse_activity_metadata(url, &text) {
        Ok(metadata) => metadata,
        Err(failure) => {
            log::debug!("candidate {url} not parsable: {}", failure.message);
            return None;
        }
    };

    // No element tag means nothing can be rendered from this file; treat it
    // as a miss so the assets fallback still runs.
    if metadata.element.is_none() {
        log::debug!("candidate {url} has no element defined in metadata");
        return None;
    }

    if let Some(module_src) = &metadata.module_src {
        metadata.module_src = Some(resolver::resolve_relative_url(url, module_src));
    }

    Some(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_fetcher::StaticContentFetcher;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://api.github.com/repos/digital-blueprint/cabinet-app/contents/";

    fn stub(path: &str) -> ActivityStub {
        ActivityStub {
            path: path.to_string(),
            visible: None,
            app_name: Some("dbp-cabinet".into()),
            app_git_url: Some(BASE.into()),
        }
    }

    fn metadata_body(element: &str) -> String {
        format!(
            r#"{{"element": "{element}", "module_src": "./activity.js", "routing_name": "r", "name": {{"en": "Activity"}}}}"#
        )
    }

    #[tokio::test]
    async fn src_candidate_wins_when_it_succeeds() {
        let mut fetcher = StaticContentFetcher::new();
        let src_url = format!("{BASE}src/activity-a.metadata.json");
        fetcher.insert(
            &src_url,
            "activity-a.metadata.json",
            &src_url,
            &metadata_body("dbp-activity-a"),
        );

        let result = locate_activity(&fetcher, &stub("activity-a.metadata.json")).await;
        let located = match result {
            LocateResult::Found(located) => located,
            LocateResult::Exhausted(warning) => panic!("unexpected exhaustion: {warning:?}"),
        };

        assert_eq!(located.metadata.element.as_deref(), Some("dbp-activity-a"));
        assert_eq!(fetcher.requested_urls(), vec![src_url]);
    }

    #[tokio::test]
    async fn falls_back_to_assets_and_tries_candidates_in_order() {
        let mut fetcher = StaticContentFetcher::new();
        let assets_url = format!("{BASE}assets/activity-a.metadata.json");
        fetcher.insert(
            &assets_url,
            "activity-a.metadata.json",
            &assets_url,
            &metadata_body("dbp-activity-a"),
        );

        let result = locate_activity(&fetcher, &stub("activity-a.metadata.json")).await;
        assert!(matches!(result, LocateResult::Found(_)));

        assert_eq!(
            fetcher.requested_urls(),
            vec![
                format!("{BASE}src/activity-a.metadata.json"),
                assets_url,
            ]
        );
    }

    #[tokio::test]
    async fn exhaustion_is_surfaced_as_a_warning() {
        let fetcher = StaticContentFetcher::new();

        let result = locate_activity(&fetcher, &stub("missing.metadata.json")).await;
        let warning = match result {
            LocateResult::Exhausted(warning) => warning,
            LocateResult::Found(located) => panic!("unexpected hit: {located:?}"),
        };

        assert_eq!(warning.path, "missing.metadata.json");
        assert_eq!(
            warning.attempted,
            vec![
                format!("{BASE}src/missing.metadata.json"),
                format!("{BASE}assets/missing.metadata.json"),
            ]
        );
    }

    #[tokio::test]
    async fn metadata_without_element_falls_through_to_assets() {
        let mut fetcher = StaticContentFetcher::new();
        let src_url = format!("{BASE}src/activity-a.metadata.json");
        let assets_url = format!("{BASE}assets/activity-a.metadata.json");
        fetcher.insert(
            &src_url,
            "activity-a.metadata.json",
            &src_url,
            r#"{"routing_name": "broken"}"#,
        );
        fetcher.insert(
            &assets_url,
            "activity-a.metadata.json",
            &assets_url,
            &metadata_body("dbp-activity-a"),
        );

        let result = locate_activity(&fetcher, &stub("activity-a.metadata.json")).await;
        let located = match result {
            LocateResult::Found(located) => located,
            LocateResult::Exhausted(warning) => panic!("unexpected exhaustion: {warning:?}"),
        };

        assert_eq!(located.metadata.routing_name, "r");
    }

    #[tokio::test]
    async fn located_metadata_inherits_stub_visibility_and_owner() {
        let mut fetcher = StaticContentFetcher::new();
        let src_url = format!("{BASE}src/activity-a.metadata.json");
        fetcher.insert(
            &src_url,
            "activity-a.metadata.json",
            &src_url,
            &metadata_body("dbp-activity-a"),
        );

        let mut hidden = stub("activity-a.metadata.json");
        hidden.visible = Some(false);

        let result = locate_activity(&fetcher, &hidden).await;
        let located = match result {
            LocateResult::Found(located) => located,
            LocateResult::Exhausted(warning) => panic!("unexpected exhaustion: {warning:?}"),
        };

        assert_eq!(located.metadata.visible, Some(false));
        assert_eq!(located.metadata.app_name.as_deref(), Some("dbp-cabinet"));
        // module_src resolved against the metadata file's own URL.
        assert_eq!(
            located.metadata.module_src.as_deref(),
            Some("https://api.github.com/repos/digital-blueprint/cabinet-app/contents/src/activity.js")
        );
    }
}
