// Unit tests for Pipeline execution
use async_trait::async_trait;
use modkit_core::error::{ModkitError, Result};
use modkit_core::pipeline::{ENTRY_SIGNATURE, PipeMap, PipeNode, Pipeline, TypedKey};
use modkit_core::{DiagnosticSink, Diagnostics, Severity};

const TRAIL: TypedKey<Vec<String>> = TypedKey::new("trail");

struct RecordNode {
    name: &'static str,
    fail: bool,
}

#[async_trait]
impl PipeNode for RecordNode {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn input(&self) -> Vec<String> {
        vec![]
    }

    fn output(&self) -> Vec<String> {
        vec!["trail".to_string()]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        diagnostics.info(format!("ran {}", self.name));
        if self.fail {
            diagnostics.error(format!("{} failed", self.name));
            return Err(ModkitError::BuildFailed);
        }
        match data.get_typed_mut(TRAIL) {
            Some(trail) => trail.push(self.name.to_string()),
            None => data.insert_typed(TRAIL, vec![self.name.to_string()]),
        }
        Ok(())
    }
}

fn node(name: &'static str, fail: bool) -> Box<dyn PipeNode + Send + Sync> {
    Box::new(RecordNode { name, fail })
}

#[tokio::test]
async fn test_nodes_run_in_order() {
    let pipeline = Pipeline::new("test")
        .add_node(node("first", false))
        .add_node(node("second", false));
    assert_eq!(pipeline.node_names(), vec!["first", "second"]);

    let mut data = PipeMap::new();
    let mut diagnostics = Diagnostics::new();
    pipeline.execute(&mut data, &mut diagnostics).await.unwrap();

    assert_eq!(data.get_typed(TRAIL).unwrap(), &vec!["first", "second"]);
    assert_eq!(diagnostics.len(), 2);
}

#[tokio::test]
async fn test_failure_keeps_diagnostics_and_data() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let pipeline = Pipeline::new("test")
        .add_node(node("first", false))
        .add_node(node("broken", true))
        .add_node(node("never", false));

    let mut data = PipeMap::new();
    let mut diagnostics = Diagnostics::new();
    let result = pipeline.execute(&mut data, &mut diagnostics).await;

    assert!(matches!(result, Err(ModkitError::BuildFailed)));
    assert_eq!(data.get_typed(TRAIL).unwrap(), &vec!["first"]);
    assert!(diagnostics.has_errors());
    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["ran first", "ran broken", "broken failed"]);
}

#[tokio::test]
async fn test_missing_external_input() {
    let pipeline = Pipeline::new("test")
        .with_external_inputs(vec!["entry_signature".to_string()])
        .add_node(node("first", false));

    let mut data = PipeMap::new();
    let mut diagnostics = Diagnostics::new();
    let result = pipeline.execute(&mut data, &mut diagnostics).await;
    assert!(matches!(result, Err(ModkitError::MissingInput(_))));
    assert!(data.get_typed(TRAIL).is_none());

    data.insert_typed(ENTRY_SIGNATURE, String::new());
    pipeline.execute(&mut data, &mut diagnostics).await.unwrap();
    assert_eq!(
        diagnostics.filtered(Severity::Info).len(),
        diagnostics.len()
    );
}
