//! Command implementations.
//!
//! Results are written to `out` as JSON, one value per line, so they can be
//! piped into other tools. Logs go to stderr.

use std::io::Write;

use elastic_rest_client::{ClusterInfo, ElasticRestClient, IndexSettings, ScrollSearch};
use elastic_rest_shared::{DocumentId, IndexName, StringSearchQuery};
use serde_json::Value;
use tracing::info;

use crate::cli::Commands;
use crate::CliError;

/// Run one command against a connected client.
pub async fn run<W: Write>(
    command: &Commands,
    client: &ElasticRestClient,
    cluster: &ClusterInfo,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::Ping => write_json(out, cluster),
        Commands::Get { index, id } => {
            let document = client
                .document()
                .get(&IndexName::new(index.as_str()), &DocumentId::new(id.as_str()))
                .await?
                .ok_or_else(|| CliError::NotFound(format!("{}/{}", index, id)))?;
            write_json(out, &document.to_json())
        }
        Commands::Search { index, query, size } => {
            let documents = client
                .document()
                .search_with_size(&IndexName::new(index.as_str()), &StringSearchQuery::new(query.as_str()), *size)
                .await?;
            for document in &documents {
                write_json(out, &document.to_json())?;
            }
            Ok(())
        }
        Commands::Count { index, query } => {
            let count = client
                .document()
                .count(&IndexName::new(index.as_str()), &StringSearchQuery::new(query.as_str()))
                .await?;
            write_json(out, &count)
        }
        Commands::Scroll {
            index,
            query,
            page_size,
        } => scroll(client, index, query, *page_size, out).await,
        Commands::CreateIndex {
            index,
            shards,
            replicas,
        } => {
            let index = IndexName::new(index.as_str());
            let ack = match (shards, replicas) {
                (None, None) => client.index().create(&index).await?,
                _ => {
                    let mut settings = IndexSettings::new();
                    if let Some(shards) = shards {
                        settings = settings.shards(*shards);
                    }
                    if let Some(replicas) = replicas {
                        settings = settings.replicas(*replicas);
                    }
                    client.index().create_with_settings(&index, &settings).await?
                }
            };
            write_json(out, &ack)
        }
        Commands::DeleteIndex { index } => {
            let ack = client.index().delete(&IndexName::new(index.as_str())).await?;
            write_json(out, &ack)
        }
        Commands::Index {
            index,
            document,
            id,
        } => {
            let document: Value = serde_json::from_str(document)?;
            let index = IndexName::new(index.as_str());
            let response = match id {
                Some(id) => {
                    client
                        .document()
                        .index(&index, &DocumentId::new(id.as_str()), &document)
                        .await?
                }
                None => client.document().index_auto_id(&index, &document).await?,
            };
            write_json(out, &response)
        }
    }
}

async fn scroll<W: Write>(
    client: &ElasticRestClient,
    index: &str,
    query: &str,
    page_size: usize,
    out: &mut W,
) -> Result<(), CliError> {
    let mut session =
        client.scroll_search(IndexName::new(index), StringSearchQuery::new(query), page_size)?;

    let streamed = stream_pages(&mut session, out).await;
    let cleared = session.clear().await;

    let written = streamed?;
    cleared?;
    info!(index = %index, documents = written, "Scroll completed");
    Ok(())
}

/// Write every page of `session` to `out`. The context is released by the
/// caller on both paths.
async fn stream_pages<W: Write>(session: &mut ScrollSearch, out: &mut W) -> Result<usize, CliError> {
    let mut written = 0usize;
    while session.advance().await? {
        for document in session.current_page() {
            write_json(out, &document.to_json())?;
        }
        written += session.current_page().len();
    }
    out.flush()?;
    Ok(written)
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use elastic_rest_client::interfaces::HttpMethod;
    use elastic_rest_client::{HttpRequest, HttpResponse, HttpTransport, TransportError};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct ScriptedTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<(u16, Value)>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| HttpResponse::new(status, body.to_string()))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().await.push(request);
            self.responses
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| TransportError::connection("no response scripted"))
        }
    }

    fn cluster() -> ClusterInfo {
        ClusterInfo {
            cluster_name: "docker-cluster".to_string(),
            ..Default::default()
        }
    }

    fn output(buffer: Vec<u8>) -> Vec<Value> {
        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn hit(id: &str) -> Value {
        json!({"_index": "testindex", "_id": id, "_source": {"id": id}})
    }

    #[tokio::test]
    async fn test_scroll_streams_all_documents_and_clears() {
        let transport = ScriptedTransport::new(vec![
            (200, json!({"_scroll_id": "s1", "hits": {"hits": [hit("1"), hit("2")]}})),
            (200, json!({"_scroll_id": "s1", "hits": {"hits": [hit("3")]}})),
            (200, json!({"_scroll_id": "s1", "hits": {"hits": []}})),
            (200, json!({"succeeded": true, "num_freed": 1})),
        ]);
        let client = ElasticRestClient::with_transport(transport.clone());
        let command = Commands::Scroll {
            index: "testindex".to_string(),
            query: "*".to_string(),
            page_size: 2,
        };
        let mut buffer = Vec::new();

        run(&command, &client, &cluster(), &mut buffer).await.unwrap();

        let lines = output(buffer);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["_id"], json!("3"));
        assert_eq!(transport.requests.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_scroll_clears_context_when_a_page_fails() {
        let transport = ScriptedTransport::new(vec![
            (200, json!({"_scroll_id": "s1", "hits": {"hits": [hit("1")]}})),
            (500, json!({"error": {"type": "search_phase_execution_exception"}})),
            (200, json!({"succeeded": true, "num_freed": 1})),
        ]);
        let client = ElasticRestClient::with_transport(transport.clone());
        let command = Commands::Scroll {
            index: "testindex".to_string(),
            query: "*".to_string(),
            page_size: 1,
        };
        let mut buffer = Vec::new();

        let result = run(&command, &client, &cluster(), &mut buffer).await;

        assert!(result.is_err());
        assert_eq!(output(buffer).len(), 1);
        let requests = transport.requests.lock().await;
        assert_eq!(requests.len(), 3);
        let last = requests.last().unwrap();
        assert_eq!(last.method, HttpMethod::Delete);
        assert_eq!(last.path, "_search/scroll");
        assert_eq!(last.json_body().unwrap()["scroll_id"], json!(["s1"]));
    }

    #[tokio::test]
    async fn test_get_missing_document_is_error() {
        let transport = ScriptedTransport::new(vec![(404, json!({"found": false}))]);
        let client = ElasticRestClient::with_transport(transport);
        let command = Commands::Get {
            index: "testindex".to_string(),
            id: "missing".to_string(),
        };
        let mut buffer = Vec::new();

        let err = run(&command, &client, &cluster(), &mut buffer).await.unwrap_err();

        assert!(matches!(err, CliError::NotFound(_)));
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_index_rejects_invalid_json() {
        let transport = ScriptedTransport::new(vec![]);
        let client = ElasticRestClient::with_transport(transport.clone());
        let command = Commands::Index {
            index: "testindex".to_string(),
            document: "{not json".to_string(),
            id: None,
        };
        let mut buffer = Vec::new();

        let err = run(&command, &client, &cluster(), &mut buffer).await.unwrap_err();

        assert!(matches!(err, CliError::JsonError(_)));
        assert!(transport.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_count_and_ping_output() {
        let transport = ScriptedTransport::new(vec![(200, json!({"count": 7}))]);
        let client = ElasticRestClient::with_transport(transport);
        let mut buffer = Vec::new();

        run(
            &Commands::Count {
                index: "testindex".to_string(),
                query: "*".to_string(),
            },
            &client,
            &cluster(),
            &mut buffer,
        )
        .await
        .unwrap();
        run(&Commands::Ping, &client, &cluster(), &mut buffer).await.unwrap();

        let lines = output(buffer);
        assert_eq!(lines[0], json!(7));
        assert_eq!(lines[1]["cluster_name"], json!("docker-cluster"));
    }

    #[tokio::test]
    async fn test_create_index_with_shards_sends_settings() {
        let transport = ScriptedTransport::new(vec![(200, json!({"acknowledged": true}))]);
        let client = ElasticRestClient::with_transport(transport.clone());
        let command = Commands::CreateIndex {
            index: "testindex".to_string(),
            shards: Some(3),
            replicas: None,
        };
        let mut buffer = Vec::new();

        run(&command, &client, &cluster(), &mut buffer).await.unwrap();

        let requests = transport.requests.lock().await;
        let body = requests[0].json_body().unwrap();
        assert_eq!(body["settings"]["number_of_shards"], json!(3));
        assert_eq!(output(buffer)[0], json!({"acknowledged": true}));
    }
}
