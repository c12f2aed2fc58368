//! Structural and concurrency tests.
//!
//! A hand-written resource client in the shape code generators produce is
//! built on top of `RestLiClient`; these tests check that it satisfies the
//! thread-safety bounds callers rely on and that one client serves many
//! concurrent calls.

use std::sync::Arc;

use restli_client::codec::{DecodeError, EncodeError, Marshaler, PathSpec, Reader, Unmarshaler, Writer};
use restli_client::{
    ClientError, CreatedEntity, EntityPath, FinderResults, HostUrl, Query, QueryParams,
    ReqwestTransport, RequestContext, RestLiClient, RestLiError, RestLiMethod, Transport,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Generated-Style Resource Client
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
struct Widget {
    id: i64,
    name: String,
}

impl Marshaler for Widget {
    fn marshal_rest_li(&self, writer: Writer<'_>) -> Result<(), EncodeError> {
        writer.write_map(|fields| {
            fields.entry("id", |w| w.write_i64(self.id))?;
            fields.entry("name", |w| w.write_string(&self.name))
        })
    }
}

impl Unmarshaler for Widget {
    fn unmarshal_rest_li(reader: Reader<'_>) -> Result<Self, DecodeError> {
        let mut widget = Self::default();
        reader.read_record(&["id", "name"], |reader, field| {
            match field {
                "id" => widget.id = reader.read_i64()?,
                "name" => widget.name = reader.read_string()?,
                _ => reader.skip()?,
            }
            Ok(())
        })?;
        Ok(widget)
    }
}

const WIDGETS: &str = "widgets";

/// Client for the `widgets` collection resource.
struct WidgetsClient<T: Transport = ReqwestTransport> {
    client: RestLiClient<T>,
    read_only_fields: PathSpec,
}

impl<T: Transport> WidgetsClient<T> {
    fn new(client: RestLiClient<T>) -> Self {
        Self {
            client,
            read_only_fields: PathSpec::new(["id"]).unwrap(),
        }
    }

    fn entity(id: i64) -> Result<EntityPath, ClientError> {
        Ok(EntityPath::new(WIDGETS)?.key(&id)?)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Widget, ClientError> {
        let path = Self::entity(id)?;
        let request = self
            .client
            .new_get_request(ctx, &path, Query::None, RestLiMethod::Get)?;
        Ok(self.client.do_and_decode(request).await?.into_value())
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        widget: &Widget,
    ) -> Result<CreatedEntity<i64>, ClientError> {
        let path = EntityPath::new(WIDGETS)?;
        let request = self.client.new_create_request(
            ctx,
            &path,
            Query::None,
            RestLiMethod::Create,
            widget,
            &self.read_only_fields,
        )?;
        self.client.do_and_ignore(request).await?.created_entity()
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), ClientError> {
        let path = Self::entity(id)?;
        let request = self
            .client
            .new_delete_request(ctx, &path, Query::None, RestLiMethod::Delete)?;
        self.client.do_and_ignore(request).await?;
        Ok(())
    }

    async fn find_by_color(
        &self,
        ctx: &RequestContext,
        color: &str,
    ) -> Result<FinderResults<Widget>, ClientError> {
        let path = EntityPath::new(WIDGETS)?;
        let params = QueryParams::new().add("color", color)?;
        let request = self.client.new_finder_request(ctx, &path, "byColor", params)?;
        Ok(self.client.do_and_decode(request).await?.into_value())
    }
}

fn widgets_client(server: &MockServer) -> WidgetsClient {
    WidgetsClient::new(
        RestLiClient::builder()
            .host(HostUrl::new(server.uri()).unwrap())
            .build()
            .unwrap(),
    )
}

fn restli_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("X-RestLi-Protocol-Version", "2.0.0")
}

// ============================================================================
// Thread-Safety Bounds
// ============================================================================

#[test]
fn test_public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestLiClient>();
    assert_send_sync::<RestLiClient<ReqwestTransport>>();
    assert_send_sync::<WidgetsClient>();
    assert_send_sync::<ClientError>();
    assert_send_sync::<RestLiError>();
    assert_send_sync::<PathSpec>();
}

#[test]
fn test_method_table_is_consistent_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                RestLiMethod::ALL
                    .iter()
                    .map(|method| method.as_str().parse::<RestLiMethod>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), RestLiMethod::ALL.to_vec());
    }
}

// ============================================================================
// Resource Client Behavior
// ============================================================================

#[tokio::test]
async fn test_resource_client_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/widgets"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-RestLi-Protocol-Version", "2.0.0")
                .insert_header("X-RestLi-Id", "21"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets/21"))
        .respond_with(restli_ok().set_body_json(json!({"id": 21, "name": "flange"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("q", "byColor"))
        .and(query_param("color", "blue"))
        .respond_with(restli_ok().set_body_json(json!({
            "elements": [{"id": 21, "name": "flange"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/widgets/21"))
        .respond_with(
            ResponseTemplate::new(204).insert_header("X-RestLi-Protocol-Version", "2.0.0"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let widgets = widgets_client(&server);
    let ctx = RequestContext::new();

    let created = widgets
        .create(
            &ctx,
            &Widget {
                id: 0,
                name: "flange".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, 21);

    let widget = widgets.get(&ctx, created.id).await.unwrap();
    assert_eq!(widget.name, "flange");

    let found = widgets.find_by_color(&ctx, "blue").await.unwrap();
    assert_eq!(found.elements, vec![widget]);
    assert!(found.paging.is_none());

    widgets.delete(&ctx, created.id).await.unwrap();
}

#[tokio::test]
async fn test_one_client_serves_concurrent_calls() {
    let server = MockServer::start().await;

    for id in 0..16_i64 {
        Mock::given(method("GET"))
            .and(path(format!("/widgets/{id}")))
            .respond_with(
                restli_ok().set_body_json(json!({"id": id, "name": format!("widget-{id}")})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let widgets = Arc::new(widgets_client(&server));
    let tasks: Vec<_> = (0..16_i64)
        .map(|id| {
            let widgets = Arc::clone(&widgets);
            tokio::spawn(async move { widgets.get(&RequestContext::new(), id).await })
        })
        .collect();

    for (id, task) in (0..16_i64).zip(tasks) {
        let widget = task.await.unwrap().unwrap();
        assert_eq!(widget.id, id);
        assert_eq!(widget.name, format!("widget-{id}"));
    }
}
