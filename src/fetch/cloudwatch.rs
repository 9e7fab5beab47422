use super::traits::{LogStore, LogStoreError, StreamHandle, TailPage, TailRequest};
use crate::model::{LogEntry, StreamGroupId};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::operation::get_log_events::GetLogEventsOutput;
use aws_sdk_cloudwatchlogs::types::OrderBy;
use aws_sdk_cloudwatchlogs::Client;
use chrono::DateTime;

/// GetLogEvents refuses limits above this
const MAX_EVENTS_PER_PAGE: usize = 10_000;

/// CloudWatch Logs implementation of the LogStore trait
#[derive(Debug, Clone)]
pub struct CloudWatchLogStore {
    client: Client,
}

impl CloudWatchLogStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl LogStore for CloudWatchLogStore {
    async fn latest_stream(
        &self,
        group: &StreamGroupId,
    ) -> Result<Option<StreamHandle>, LogStoreError> {
        let result = self
            .client
            .describe_log_streams()
            .log_group_name(group.as_str())
            .order_by(OrderBy::LastEventTime)
            .descending(true)
            .limit(1)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if matches!(err.as_service_error(), Some(e) if e.is_resource_not_found_exception()) {
                    return Err(LogStoreError::GroupNotFound);
                }
                return Err(LogStoreError::Remote(DisplayErrorContext(&err).to_string()));
            }
        };

        let handle = output.log_streams().first().and_then(|stream| {
            stream.log_stream_name().map(|name| StreamHandle {
                name: name.to_string(),
                last_event: stream
                    .last_event_timestamp()
                    .and_then(DateTime::from_timestamp_millis),
            })
        });

        Ok(handle)
    }

    async fn read_tail(
        &self,
        group: &StreamGroupId,
        stream: &StreamHandle,
        request: TailRequest,
    ) -> Result<TailPage, LogStoreError> {
        let limit = request.limit.clamp(1, MAX_EVENTS_PER_PAGE) as i32;

        let output = self
            .client
            .get_log_events()
            .log_group_name(group.as_str())
            .log_stream_name(&stream.name)
            .start_from_head(false)
            .limit(limit)
            .set_next_token(request.backward_token)
            .send()
            .await
            .map_err(|err| LogStoreError::Remote(DisplayErrorContext(&err).to_string()))?;

        Ok(tail_page(&output))
    }
}

/// Events as returned (newest first) and the backward token only.
/// The forward token points toward newer events and is never followed.
fn tail_page(output: &GetLogEventsOutput) -> TailPage {
    let entries = output
        .events()
        .iter()
        .map(|event| LogEntry::from_millis(event.timestamp(), event.message().map(str::to_string)))
        .collect();

    TailPage {
        entries,
        backward_token: output.next_backward_token().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudwatchlogs::types::OutputLogEvent;

    fn event(millis: Option<i64>, message: Option<&str>) -> OutputLogEvent {
        OutputLogEvent::builder()
            .set_timestamp(millis)
            .set_message(message.map(str::to_string))
            .build()
    }

    #[test]
    fn test_tail_page_follows_backward_token_only() {
        let output = GetLogEventsOutput::builder()
            .events(event(Some(1_700_000_002_500), Some("second")))
            .events(event(Some(1_700_000_001_000), Some("first")))
            .next_forward_token("f/00000000000000000000000000000000000000000000000000000002")
            .next_backward_token("b/00000000000000000000000000000000000000000000000000000001")
            .build();

        let page = tail_page(&output);

        assert_eq!(
            page.backward_token.as_deref(),
            Some("b/00000000000000000000000000000000000000000000000000000001")
        );
        let messages: Vec<_> = page.entries.iter().map(|e| e.message.as_deref()).collect();
        assert_eq!(messages, vec![Some("second"), Some("first")]);
        assert_eq!(
            page.entries[0].timestamp,
            DateTime::from_timestamp_millis(1_700_000_002_500)
        );
    }

    #[test]
    fn test_tail_page_keeps_events_with_missing_fields() {
        let output = GetLogEventsOutput::builder()
            .events(event(None, None))
            .next_forward_token("f/1")
            .build();

        let page = tail_page(&output);

        assert_eq!(page.entries, vec![LogEntry::new(None, None)]);
        assert_eq!(page.backward_token, None);
    }
}
