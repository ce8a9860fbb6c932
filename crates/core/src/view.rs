//! Presentation logic: what the article list shows and how.

use std::collections::HashSet;

use crate::cache::{QueryStatus, TypedState};
use crate::model::{Article, SearchResult};

/// Prefix of every article link.
pub const ARTICLE_LINK_BASE: &str = "https://en.wikipedia.org/wiki/";

/// Shown instead of the list when the article query failed.
pub const ARTICLES_ERROR_MESSAGE: &str = "Unable to load articles. Please refresh the page to try again.";

/// An article and whether it is in the current search results.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRow {
    pub article: Article,
    pub matched: bool,
}

/// Which branch of the article list to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleListView {
    Error(&'static str),
    Loading,
    List(Vec<ArticleRow>),
}

/// Tag each article as matched when its title appears in `results`.
///
/// Article order is preserved; `ranking` plays no part.
pub fn join_articles_with_search(articles: &[Article], results: &[SearchResult]) -> Vec<ArticleRow> {
    let titles: HashSet<&str> = results.iter().map(|result| result.title.as_str()).collect();

    articles
        .iter()
        .map(|article| ArticleRow { article: article.clone(), matched: titles.contains(article.title.as_str()) })
        .collect()
}

/// True while any query has not produced a usable result.
///
/// `Uninitialized` counts as loading: the query has been asked for but not
/// answered yet.
pub fn compute_disabled(statuses: &[QueryStatus]) -> bool {
    statuses
        .iter()
        .any(|status| matches!(status, QueryStatus::Loading | QueryStatus::Error | QueryStatus::Uninitialized))
}

/// External link for an article: spaces become underscores, nothing else is
/// escaped.
pub fn article_link_target(title: &str) -> String {
    format!("{ARTICLE_LINK_BASE}{}", title.replace(' ', "_"))
}

/// Pick the error, loading, or list branch.
///
/// An article error wins over everything else. While articles have no data
/// yet the list is loading; once data exists it stays visible during
/// refetches. Search state never blocks the list, it only decides matches.
pub fn select_view(articles: &TypedState<Vec<Article>>, search: &TypedState<Vec<SearchResult>>) -> ArticleListView {
    if articles.is_error() {
        return ArticleListView::Error(ARTICLES_ERROR_MESSAGE);
    }

    match &articles.data {
        Some(list) => {
            let results = search.data.as_deref().unwrap_or_default();
            ArticleListView::List(join_articles_with_search(list, results))
        }
        None => ArticleListView::Loading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    fn article(title: &str) -> Article {
        Article::new(title, "")
    }

    fn loaded<T>(data: T) -> TypedState<T> {
        TypedState { status: QueryStatus::Success, data: Some(data), ..Default::default() }
    }

    fn failed<T>() -> TypedState<T> {
        TypedState {
            status: QueryStatus::Error,
            error: Some(TransportError::http(500, "boom")),
            ..Default::default()
        }
    }

    fn loading<T>() -> TypedState<T> {
        TypedState { status: QueryStatus::Loading, ..Default::default() }
    }

    #[test]
    fn test_join_marks_matches() {
        let rows = join_articles_with_search(&[article("A"), article("B")], &[SearchResult::new("A", 1.0)]);
        assert_eq!(
            rows,
            vec![ArticleRow { article: article("A"), matched: true }, ArticleRow { article: article("B"), matched: false }]
        );
    }

    #[test]
    fn test_join_ignores_ranking_and_unknown_titles() {
        let rows = join_articles_with_search(
            &[article("A"), article("B"), article("C")],
            &[SearchResult::new("Z", 9.0), SearchResult::new("C", 0.1), SearchResult::new("B", 5.0)],
        );
        let order: Vec<&str> = rows.iter().map(|row| row.article.title.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
        assert_eq!(rows.iter().filter(|row| row.matched).count(), 2);
    }

    #[test]
    fn test_join_keeps_duplicate_titles() {
        let rows = join_articles_with_search(&[article("A"), article("A")], &[SearchResult::new("A", 1.0)]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.matched));
    }

    #[test]
    fn test_join_empty_results() {
        let rows = join_articles_with_search(&[article("A")], &[]);
        assert!(!rows[0].matched);
    }

    #[test]
    fn test_compute_disabled() {
        assert!(compute_disabled(&[QueryStatus::Loading, QueryStatus::Success]));
        assert!(!compute_disabled(&[QueryStatus::Success, QueryStatus::Success]));
        assert!(compute_disabled(&[QueryStatus::Success, QueryStatus::Error]));
        assert!(compute_disabled(&[QueryStatus::Uninitialized]));
        assert!(!compute_disabled(&[]));
    }

    #[test]
    fn test_article_link_target() {
        assert_eq!(article_link_target("Ada Lovelace"), "https://en.wikipedia.org/wiki/Ada_Lovelace");
        assert_eq!(article_link_target("C++ (language)"), "https://en.wikipedia.org/wiki/C++_(language)");
        assert_eq!(article_link_target("a  b?c#d"), "https://en.wikipedia.org/wiki/a__b?c#d");
        assert_eq!(article_link_target(""), "https://en.wikipedia.org/wiki/");
    }

    #[test]
    fn test_articles_error_wins_over_search_state() {
        for search in [loading(), failed(), loaded(vec![SearchResult::new("A", 1.0)])] {
            let articles = failed::<Vec<Article>>();
            assert_eq!(select_view(&articles, &search), ArticleListView::Error(ARTICLES_ERROR_MESSAGE));
            assert!(compute_disabled(&[articles.status, search.status]));
        }
    }

    #[test]
    fn test_loading_until_articles_arrive() {
        assert_eq!(select_view(&loading(), &loaded(vec![])), ArticleListView::Loading);
        assert_eq!(select_view(&TypedState::default(), &TypedState::default()), ArticleListView::Loading);
    }

    #[test]
    fn test_previous_articles_stay_visible_while_refetching() {
        let articles = TypedState { status: QueryStatus::Loading, data: Some(vec![article("A")]), ..Default::default() };
        assert!(matches!(select_view(&articles, &loading()), ArticleListView::List(rows) if rows.len() == 1));
    }

    #[test]
    fn test_list_joins_search_results() {
        let view = select_view(&loaded(vec![article("A"), article("B")]), &loaded(vec![SearchResult::new("B", 1.0)]));
        let ArticleListView::List(rows) = view else { panic!("expected list") };
        assert!(!rows[0].matched);
        assert!(rows[1].matched);
    }
}
