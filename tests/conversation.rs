use async_trait::async_trait;
use linkscout::api::{LanguageModel, ModelReply};
use linkscout::error::{LinkscoutError, Result};
use linkscout::mcp::ToolExecutor;
use linkscout::models::{
    Message, MessageContent, ResultKind, Role, ToolCall, ToolDescriptor, JOB_SEARCH_TOOL,
    PEOPLE_SEARCH_TOOL,
};
use linkscout::session::{ConversationSession, SessionOptions};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

enum Step {
    Reply(ModelReply),
    Fail,
}

/// Language model that plays back a script and records what it was sent.
#[derive(Clone, Default)]
struct ScriptedModel {
    script: Arc<Mutex<VecDeque<Step>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedModel {
    fn push_text(&self, text: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Step::Reply(ModelReply::Text(text.to_string())));
        self
    }

    fn push_call(&self, name: &str, arguments: Value) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Step::Reply(ModelReply::ToolCalls(vec![ToolCall {
                name: name.to_string(),
                arguments,
            }])));
        self
    }

    fn push_calls(&self, calls: Vec<ToolCall>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Step::Reply(ModelReply::ToolCalls(calls)));
        self
    }

    fn push_failure(&self) -> &Self {
        self.script.lock().unwrap().push_back(Step::Fail);
        self
    }

    fn calls(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }

    fn last_user_input(&self) -> String {
        let seen = self.seen.lock().unwrap();
        let window = seen.last().expect("model was called");
        window
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .and_then(|m| m.model_input_text())
            .expect("window has a user message")
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(
        &self,
        _system_prompt: Option<&str>,
        messages: &[Message],
        _tools: &[ToolDescriptor],
    ) -> Result<ModelReply> {
        self.seen.lock().unwrap().push(messages.to_vec());
        match self.script.lock().unwrap().pop_front() {
            Some(Step::Reply(reply)) => Ok(reply),
            Some(Step::Fail) => Err(LinkscoutError::ApiError {
                status: 503,
                message: "model overloaded".to_string(),
            }),
            None => Ok(ModelReply::Text("(script exhausted)".to_string())),
        }
    }
}

/// Tool executor with canned results per tool name.
#[derive(Clone, Default)]
struct CannedTools {
    results: Arc<Mutex<HashMap<String, Value>>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    shut_down: Arc<Mutex<bool>>,
}

impl CannedTools {
    fn with(self, name: &str, result: Value) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(name.to_string(), result);
        self
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutor for CannedTools {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(vec![
            ToolDescriptor {
                name: JOB_SEARCH_TOOL.to_string(),
                description: Some("Search LinkedIn jobs".to_string()),
                input_schema: json!({"type": "object"}),
            },
            ToolDescriptor {
                name: PEOPLE_SEARCH_TOOL.to_string(),
                description: None,
                input_schema: json!({"type": "object"}),
            },
        ])
    }

    async fn call(&self, name: &str, arguments: &Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments.clone()));
        self.results
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| LinkscoutError::ToolError(format!("{} is unavailable", name)))
    }

    async fn shutdown(&self) -> Result<()> {
        *self.shut_down.lock().unwrap() = true;
        Ok(())
    }
}

fn austin_jobs() -> Value {
    json!([
        {
            "title": "Senior Python Developer",
            "company": "Acme Corp",
            "location": "Austin, TX",
            "job_url": "https://www.linkedin.com/jobs/view/1"
        },
        {
            "title": "Python Backend Engineer",
            "companyName": "Initech",
            "location": "Austin, TX",
            "posted_at": "2 days ago",
            "job_url": "https://www.linkedin.com/jobs/view/2"
        }
    ])
}

async fn session_with(
    model: &ScriptedModel,
    tools: &CannedTools,
) -> ConversationSession<ScriptedModel, CannedTools> {
    ConversationSession::connect(model.clone(), tools.clone(), SessionOptions::default())
        .await
        .unwrap()
}

async fn search_austin_jobs(
    model: &ScriptedModel,
    session: &mut ConversationSession<ScriptedModel, CannedTools>,
) -> String {
    model
        .push_call(
            JOB_SEARCH_TOOL,
            json!({"keywords": "Python developer", "location": "Austin"}),
        )
        .push_text("I found a couple of Python roles in Austin.");
    session
        .submit("Find Python developer jobs in Austin")
        .await
        .unwrap()
}

#[tokio::test]
async fn connect_lists_tools_once() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default();
    let session = session_with(&model, &tools).await;

    let names: Vec<&str> = session.tools().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec![JOB_SEARCH_TOOL, PEOPLE_SEARCH_TOOL]);
    assert!(session.history().is_empty());
    assert!(session.last_results().is_none());
}

#[tokio::test]
async fn job_search_end_to_end() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let mut session = session_with(&model, &tools).await;

    let answer = search_austin_jobs(&model, &mut session).await;

    assert_eq!(
        tools.calls(),
        vec![(
            JOB_SEARCH_TOOL.to_string(),
            json!({"keywords": "Python developer", "location": "Austin"})
        )]
    );
    assert!(answer.starts_with("I found a couple of Python roles in Austin.\n"));
    assert!(answer.contains("Found 2 job(s)"));
    assert!(answer.contains("1. **Senior Python Developer**"));
    assert!(answer.contains("2. **Python Backend Engineer**"));
    assert!(answer.contains("🏢 Company: Initech"));
    assert!(answer.contains("Tell me more about #2"));

    let last = session.last_results().unwrap();
    assert_eq!(last.kind(), ResultKind::Job);
    assert_eq!(last.count(), 2);
    assert_eq!(last.records(), austin_jobs().as_array().unwrap().as_slice());
}

#[tokio::test]
async fn exchange_is_recorded_with_roles() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let mut session = session_with(&model, &tools).await;

    let answer = search_austin_jobs(&model, &mut session).await;

    let roles: Vec<Role> = session.history().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::Tool, Role::Model]);

    match &session.history()[2].content {
        MessageContent::ToolResult { name, response } => {
            assert_eq!(name, JOB_SEARCH_TOOL);
            assert_eq!(response, &json!({"result": austin_jobs()}));
        }
        other => panic!("expected tool result, got {:?}", other),
    }

    // Second model call saw the tool traffic, with roles intact
    let second_call = &model.calls()[1];
    let roles: Vec<Role> = second_call.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::Tool]);

    assert_eq!(
        session.transcript(),
        vec![
            ("user", "Find Python developer jobs in Austin"),
            ("model", answer.as_str())
        ]
    );
}

#[tokio::test]
async fn follow_up_carries_context_preamble() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let mut session = session_with(&model, &tools).await;

    search_austin_jobs(&model, &mut session).await;

    model.push_text("Job #2 is the backend role at Initech.");
    let answer = session.submit("tell me more about #2").await.unwrap();
    assert_eq!(answer, "Job #2 is the backend role at Initech.");

    let input = model.last_user_input();
    assert!(input.starts_with("tell me more about #2"));
    assert!(input.contains("2 job(s) from previous query"));
    assert!(input.contains("Python Backend Engineer"));
    assert!(input.contains("Initech"));

    // Preamble stays out of the transcript
    let transcript = session.transcript();
    assert!(transcript.contains(&("user", "tell me more about #2")));
    assert!(transcript
        .iter()
        .all(|(_, text)| !text.contains("from previous query")));

    // A text-only answer keeps the previous results
    assert_eq!(session.last_results().unwrap().count(), 2);
}

#[tokio::test]
async fn first_query_has_no_preamble() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default();
    let mut session = session_with(&model, &tools).await;

    model.push_text("Hello!");
    session.submit("hi").await.unwrap();
    assert_eq!(model.last_user_input(), "hi");
}

#[tokio::test]
async fn clear_drops_history_and_context() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let mut session = session_with(&model, &tools).await;

    search_austin_jobs(&model, &mut session).await;
    session.clear();

    assert!(session.history().is_empty());
    assert!(session.last_results().is_none());

    model.push_text("What would you like to search for?");
    session.submit("tell me more about #2").await.unwrap();

    let input = model.last_user_input();
    assert_eq!(input, "tell me more about #2");
    assert_eq!(model.calls().last().unwrap().len(), 1);
}

#[tokio::test]
async fn model_never_sees_more_than_ten_messages() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let mut session = session_with(&model, &tools).await;

    for i in 0..8 {
        if i % 2 == 0 {
            model
                .push_call(JOB_SEARCH_TOOL, json!({"keywords": format!("role {}", i)}))
                .push_text("Here you go.");
        } else {
            model.push_text("Sure.");
        }
        session.submit(&format!("query {}", i)).await.unwrap();
    }

    assert!(session.history().len() > 10);
    let calls = model.calls();
    assert_eq!(calls.len(), 12);
    assert!(calls.iter().all(|window| window.len() <= 10));

    // The newest message is always the last one in the window
    let last_window = calls.last().unwrap();
    assert_eq!(
        last_window.last().unwrap().transcript_text(),
        Some("query 7")
    );
}

#[tokio::test]
async fn tool_failure_is_reported_to_the_model() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default();
    let mut session = session_with(&model, &tools).await;

    model
        .push_call(JOB_SEARCH_TOOL, json!({"keywords": "X"}))
        .push_text("Sorry, job search is unavailable right now.");

    let answer = session.submit("search for X").await.unwrap();
    assert_eq!(answer, "Sorry, job search is unavailable right now.");
    assert!(session.last_results().is_none());

    let tool_message = &model.calls()[1][2];
    match &tool_message.content {
        MessageContent::ToolResult { response, .. } => {
            let error = response["error"].as_str().unwrap();
            assert!(error.contains("search_linkedin_jobs is unavailable"));
            assert!(response.get("result").is_none());
        }
        other => panic!("expected tool result, got {:?}", other),
    }
}

#[tokio::test]
async fn upstream_failure_leaves_session_unchanged() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let mut session = session_with(&model, &tools).await;

    search_austin_jobs(&model, &mut session).await;
    let history_before = session.history().to_vec();

    // Fails after a tool round has already been staged
    model
        .push_call(PEOPLE_SEARCH_TOOL, json!({"keywords": "recruiter"}))
        .push_failure();
    let err = session.submit("who is hiring there?").await.unwrap_err();
    assert!(matches!(err, LinkscoutError::ApiError { status: 503, .. }));

    assert_eq!(session.history(), history_before.as_slice());
    assert_eq!(session.last_results().unwrap().count(), 2);

    // Still usable
    model.push_text("Let me try that again.");
    assert_eq!(
        session.submit("who is hiring there?").await.unwrap(),
        "Let me try that again."
    );
}

#[tokio::test]
async fn tool_loop_is_capped() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());
    let options = SessionOptions {
        max_tool_rounds: 2,
        ..SessionOptions::default()
    };
    let mut session = ConversationSession::connect(model.clone(), tools.clone(), options)
        .await
        .unwrap();

    for _ in 0..3 {
        model.push_call(JOB_SEARCH_TOOL, json!({"keywords": "loop"}));
    }

    let err = session.submit("find jobs").await.unwrap_err();
    assert!(matches!(err, LinkscoutError::ToolLoopExceeded { rounds: 2 }));
    assert_eq!(tools.calls().len(), 2);
    assert!(session.history().is_empty());
    assert!(session.last_results().is_none());
}

#[tokio::test]
async fn empty_query_is_rejected_without_model_call() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default();
    let mut session = session_with(&model, &tools).await;

    let err = session.submit("   ").await.unwrap_err();
    assert!(matches!(err, LinkscoutError::InvalidInput(_)));
    assert!(model.calls().is_empty());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn non_list_result_is_not_decorated() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default()
        .with(JOB_SEARCH_TOOL, austin_jobs())
        .with(PEOPLE_SEARCH_TOOL, json!({"name": "Ada Lovelace"}));
    let mut session = session_with(&model, &tools).await;

    search_austin_jobs(&model, &mut session).await;

    model
        .push_call(PEOPLE_SEARCH_TOOL, json!({"keywords": "Ada"}))
        .push_text("Ada Lovelace is a mathematician.");
    let answer = session.submit("who is Ada?").await.unwrap();

    assert_eq!(answer, "Ada Lovelace is a mathematician.");
    assert_eq!(session.last_results().unwrap().kind(), ResultKind::Job);
}

#[tokio::test]
async fn empty_list_keeps_previous_results() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default()
        .with(JOB_SEARCH_TOOL, austin_jobs())
        .with(PEOPLE_SEARCH_TOOL, json!([]));
    let mut session = session_with(&model, &tools).await;

    search_austin_jobs(&model, &mut session).await;

    model
        .push_call(PEOPLE_SEARCH_TOOL, json!({"keywords": "nobody"}))
        .push_text("No people matched.");
    let answer = session.submit("find nobody").await.unwrap();

    assert!(!answer.contains("Found"));
    assert_eq!(session.last_results().unwrap().count(), 2);
}

#[tokio::test]
async fn last_list_in_an_exchange_wins() {
    let model = ScriptedModel::default();
    let people = json!([
        {"first_name": "Grace", "last_name": "Hopper", "headline": "Rear Admiral"}
    ]);
    let tools = CannedTools::default()
        .with(JOB_SEARCH_TOOL, austin_jobs())
        .with(PEOPLE_SEARCH_TOOL, people.clone());
    let mut session = session_with(&model, &tools).await;

    model
        .push_calls(vec![
            ToolCall {
                name: JOB_SEARCH_TOOL.to_string(),
                arguments: json!({"keywords": "compilers"}),
            },
            ToolCall {
                name: PEOPLE_SEARCH_TOOL.to_string(),
                arguments: json!({"keywords": "compilers"}),
            },
        ])
        .push_text("Here are jobs and people.");

    let answer = session.submit("compiler jobs and people").await.unwrap();

    assert!(answer.contains("Found 1 profile(s)"));
    assert!(answer.contains("1. **Grace Hopper**"));
    assert!(!answer.contains("Found 2 job(s)"));

    let last = session.last_results().unwrap();
    assert_eq!(last.kind(), ResultKind::Profile);
    assert_eq!(last.records(), people.as_array().unwrap().as_slice());
}

#[tokio::test]
async fn unknown_tool_lists_render_as_items() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(
        "list_skills",
        json!([{"name": "Rust"}, {"title": "Tokio"}, "plain"]),
    );
    let mut session = session_with(&model, &tools).await;

    model
        .push_call("list_skills", json!({}))
        .push_text("Skills:");
    let answer = session.submit("what skills?").await.unwrap();

    assert!(answer.contains("Found 3 item(s)"));
    assert!(answer.contains("1. Rust"));
    assert!(answer.contains("2. Tokio"));
    assert_eq!(session.last_results().unwrap().kind(), ResultKind::Item);
}

#[tokio::test]
async fn restore_brings_back_context() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default().with(JOB_SEARCH_TOOL, austin_jobs());

    let mut first = session_with(&model, &tools).await;
    search_austin_jobs(&model, &mut first).await;
    let history = first.history().to_vec();
    let last = first.last_results().cloned();

    let mut second = session_with(&model, &tools).await;
    second.restore(history, last);

    model.push_text("That one is at Initech.");
    second.submit("where is #2?").await.unwrap();
    assert!(model
        .last_user_input()
        .contains("2 job(s) from previous query"));
}

#[tokio::test]
async fn shutdown_reaches_executor() {
    let model = ScriptedModel::default();
    let tools = CannedTools::default();
    let session = session_with(&model, &tools).await;

    session.shutdown().await.unwrap();
    assert!(*tools.shut_down.lock().unwrap());
}
