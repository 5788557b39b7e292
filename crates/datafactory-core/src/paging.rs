//! Pagination over `list` / `list_next`

use crate::error::{CoreError, Result};
use crate::models::{ActivityType, ActivityTypeListParameters};
use crate::operations::ActivityTypeOperations;
use futures::stream::{self, Stream, TryStreamExt};
use std::collections::HashSet;
use tracing::debug;

enum Cursor {
    First,
    Next(String),
    Done,
}

/// Stream every activity type, fetching pages as the stream is consumed
///
/// A next link that was already visited ends the stream with
/// [`CoreError::Validation`].
pub fn list_stream<'a, O>(
    operations: &'a O,
    resource_group_name: &'a str,
    data_factory_name: &'a str,
    parameters: &'a ActivityTypeListParameters,
) -> impl Stream<Item = Result<ActivityType>> + Send + 'a
where
    O: ActivityTypeOperations + ?Sized,
{
    let pages = stream::try_unfold(
        (Cursor::First, HashSet::<String>::new()),
        move |(cursor, mut seen)| async move {
            let page = match cursor {
                Cursor::Done => return Ok(None),
                Cursor::First => {
                    operations
                        .list(resource_group_name, data_factory_name, parameters)
                        .await?
                }
                Cursor::Next(link) => {
                    debug!(next_link = %link, "fetching next page");
                    operations.list_next(&link).await?
                }
            };

            let cursor = match page.next_link.filter(|link| !link.is_empty()) {
                Some(link) if !seen.insert(link.clone()) => {
                    return Err(CoreError::Validation(format!(
                        "service returned next link '{}' more than once",
                        link
                    )));
                }
                Some(link) => Cursor::Next(link),
                None => Cursor::Done,
            };
            Ok(Some((page.activity_types, (cursor, seen))))
        },
    );

    pages
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
}

/// Fetch every page and return all activity types
pub async fn list_all<O>(
    operations: &O,
    resource_group_name: &str,
    data_factory_name: &str,
    parameters: &ActivityTypeListParameters,
) -> Result<Vec<ActivityType>>
where
    O: ActivityTypeOperations + ?Sized,
{
    list_stream(operations, resource_group_name, data_factory_name, parameters)
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ActivityTypeCreateOrUpdateParameters, ActivityTypeCreateOrUpdateResponse,
        ActivityTypeCreateOrUpdateWithRawJsonContentParameters, ActivityTypeGetParameters,
        ActivityTypeGetResponse, ActivityTypeListResponse, LongRunningOperationResponse,
    };
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by next link; "" is the first page
    struct FakePages {
        pages: HashMap<String, (Vec<&'static str>, Option<String>)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakePages {
        fn new(pages: &[(&str, Vec<&'static str>, Option<&str>)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(key, names, next)| {
                        (key.to_string(), (names.clone(), next.map(str::to_string)))
                    })
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn page(&self, key: &str) -> Result<ActivityTypeListResponse> {
            self.calls.lock().unwrap().push(key.to_string());
            let (names, next) = self
                .pages
                .get(key)
                .ok_or_else(|| CoreError::Validation(format!("no page {key}")))?;
            Ok(ActivityTypeListResponse {
                request_id: None,
                status_code: 200,
                activity_types: names
                    .iter()
                    .map(|n| ActivityType::new(*n, json!({})))
                    .collect(),
                next_link: next.clone(),
            })
        }
    }

    #[async_trait]
    impl ActivityTypeOperations for FakePages {
        async fn begin_delete(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<LongRunningOperationResponse> {
            unimplemented!()
        }
        async fn delete(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<LongRunningOperationResponse> {
            unimplemented!()
        }
        async fn create_or_update(
            &self,
            _: &str,
            _: &str,
            _: &ActivityTypeCreateOrUpdateParameters,
        ) -> Result<ActivityTypeCreateOrUpdateResponse> {
            unimplemented!()
        }
        async fn create_or_update_with_raw_json_content(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &ActivityTypeCreateOrUpdateWithRawJsonContentParameters,
        ) -> Result<ActivityTypeCreateOrUpdateResponse> {
            unimplemented!()
        }
        async fn get(
            &self,
            _: &str,
            _: &str,
            _: &ActivityTypeGetParameters,
        ) -> Result<ActivityTypeGetResponse> {
            unimplemented!()
        }
        async fn list(
            &self,
            _: &str,
            _: &str,
            _: &ActivityTypeListParameters,
        ) -> Result<ActivityTypeListResponse> {
            self.page("")
        }
        async fn list_next(&self, next_link: &str) -> Result<ActivityTypeListResponse> {
            self.page(next_link)
        }
    }

    fn names(items: &[ActivityType]) -> Vec<&str> {
        items.iter().map(|a| a.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_all_follows_next_links() {
        let fake = FakePages::new(&[
            ("", vec!["A", "B"], Some("p2")),
            ("p2", vec![], Some("p3")),
            ("p3", vec!["C"], None),
        ]);
        let params = ActivityTypeListParameters::new();

        let all = list_all(&fake, "rg", "df", &params).await.unwrap();
        assert_eq!(names(&all), vec!["A", "B", "C"]);
        assert_eq!(*fake.calls.lock().unwrap(), vec!["", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_empty_next_link_ends_listing() {
        let fake = FakePages::new(&[("", vec!["A"], Some(""))]);
        let params = ActivityTypeListParameters::new();

        let all = list_all(&fake, "rg", "df", &params).await.unwrap();
        assert_eq!(names(&all), vec!["A"]);
        assert_eq!(fake.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_next_link_is_an_error() {
        let fake = FakePages::new(&[
            ("", vec!["A"], Some("p2")),
            ("p2", vec!["B"], Some("p2")),
        ]);
        let params = ActivityTypeListParameters::new();

        let err = list_all(&fake, "rg", "df", &params).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("p2"));
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let fake = FakePages::new(&[
            ("", vec!["A", "B"], Some("p2")),
            ("p2", vec!["C"], None),
        ]);
        let params = ActivityTypeListParameters::new();

        let first_two: Vec<_> = list_stream(&fake, "rg", "df", &params)
            .take(2)
            .collect()
            .await;
        assert_eq!(first_two.len(), 2);
        assert_eq!(fake.calls.lock().unwrap().len(), 1);
    }
}
