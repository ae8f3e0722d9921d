//! Test Support
//!
//! In-memory backend speaking the REST surface, a recording navigator and a
//! harness wiring them to a real `ApiClient` and `QueryCache`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{ApiClient, HttpRequest, HttpResponse, Method, Navigator, Transport};
use crate::error::ApiError;
use crate::models::{
    Board, Card, GitHubAttachment, GitHubInfo, GitHubItemKind, Member, Notification, Session, Task, TaskStatus, User,
};
use crate::query::QueryCache;
use crate::storage::{MemoryStorage, SessionStore};

pub const BASE_URL: &str = "http://api.test";
pub const VALID_CODE: &str = "424242";
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize?client_id=taskboard";

pub fn user_fixture() -> User {
    User {
        id: "u1".to_string(),
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
        avatar: None,
    }
}

pub fn session_fixture() -> Session {
    Session { access_token: "token-123".to_string(), user: user_fixture() }
}

pub fn member(id: &str, name: &str) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        avatar: None,
    }
}

pub fn board(id: &str, name: &str) -> Board {
    Board { id: id.to_string(), name: name.to_string(), description: String::new(), members: Vec::new() }
}

pub fn card(id: &str, name: &str) -> Card {
    Card { id: id.to_string(), name: name.to_string(), description: String::new(), task_count: 0 }
}

pub fn task(id: &str, card_id: &str) -> Task {
    Task {
        id: id.to_string(),
        card_id: card_id.to_string(),
        title: format!("Task {id}"),
        description: String::new(),
        status: TaskStatus::Todo,
        assigned_members: Vec::new(),
    }
}

#[derive(Default)]
struct BackendState {
    requests: Vec<HttpRequest>,
    failures: VecDeque<(u16, String)>,
    offline: bool,
    hold: Option<oneshot::Receiver<()>>,
    next_id: u32,
    boards: Vec<Board>,
    /// Boards the user was invited to but has not joined yet
    invited_boards: Vec<Board>,
    cards: Vec<(String, Card)>,
    tasks: Vec<(String, Task)>,
    members: Vec<(String, Member)>,
    notifications: Vec<Notification>,
    invites: Vec<Value>,
    invite_responses: Vec<Value>,
    /// Keyed by task id
    attachments: Vec<(String, GitHubAttachment)>,
    repositories: Vec<GitHubInfo>,
}

/// Cheap to clone; clones share state
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Rc<RefCell<BackendState>>,
}

/// Keeps the next request pending until released
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn fail_next(&self, status: u16) {
        self.fail_next_with(status, "{}");
    }

    pub fn fail_next_with(&self, status: u16, body: &str) {
        self.state.borrow_mut().failures.push_back((status, body.to_string()));
    }

    pub fn go_offline(&self) {
        self.state.borrow_mut().offline = true;
    }

    pub fn hold_next(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().hold = Some(rx);
        Gate(tx)
    }

    pub fn seed_repository(&self, info: GitHubInfo) {
        self.state.borrow_mut().repositories.push(info);
    }

    pub fn seed_board(&self, board: Board) {
        self.state.borrow_mut().boards.push(board);
    }

    pub fn seed_invited_board(&self, board: Board) {
        self.state.borrow_mut().invited_boards.push(board);
    }

    pub fn seed_card(&self, board_id: &str, card: Card) {
        self.state.borrow_mut().cards.push((board_id.to_string(), card));
    }

    pub fn seed_task(&self, board_id: &str, task: Task) {
        self.state.borrow_mut().tasks.push((board_id.to_string(), task));
    }

    pub fn seed_member(&self, board_id: &str, member: Member) {
        self.state.borrow_mut().members.push((board_id.to_string(), member));
    }

    pub fn seed_notification(&self, notification: Notification) {
        self.state.borrow_mut().notifications.push(notification);
    }

    pub fn boards(&self) -> Vec<Board> {
        self.state.borrow().boards.clone()
    }

    pub fn task(&self, task_id: &str) -> Option<Task> {
        self.state.borrow().tasks.iter().find(|(_, t)| t.id == task_id).map(|(_, t)| t.clone())
    }

    pub fn notification(&self, id: &str) -> Option<Notification> {
        self.state.borrow().notifications.iter().find(|n| n.id == id).cloned()
    }

    pub fn invites(&self) -> Vec<Value> {
        self.state.borrow().invites.clone()
    }

    pub fn invite_responses(&self) -> Vec<Value> {
        self.state.borrow().invite_responses.clone()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());
        if let Some((status, body)) = state.failures.pop_front() {
            return HttpResponse { status, body };
        }

        let path = request.url.strip_prefix(BASE_URL).unwrap_or(&request.url).to_string();
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let body = request.body.clone().unwrap_or(Value::Null);
        route(&mut state, request.method, &segments, &body)
    }
}

impl Transport for FakeBackend {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, ApiError>> {
        let backend = self.clone();
        let hold = backend.state.borrow_mut().hold.take();
        async move {
            if let Some(gate) = hold {
                let _ = gate.await;
            }
            if backend.state.borrow().offline {
                backend.state.borrow_mut().requests.push(request);
                return Err(ApiError::Network("connection refused".to_string()));
            }
            Ok(backend.handle(&request))
        }
        .boxed_local()
    }
}

fn ok<T: Serialize>(value: &T) -> HttpResponse {
    HttpResponse { status: 200, body: serde_json::to_string(value).unwrap() }
}

fn created<T: Serialize>(value: &T) -> HttpResponse {
    HttpResponse { status: 201, body: serde_json::to_string(value).unwrap() }
}

fn no_content() -> HttpResponse {
    HttpResponse { status: 204, body: String::new() }
}

fn error(status: u16, message: &str) -> HttpResponse {
    HttpResponse { status, body: json!({ "message": message }).to_string() }
}

fn field(body: &Value, name: &str) -> String {
    body.get(name).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn route(state: &mut BackendState, method: Method, segments: &[&str], body: &Value) -> HttpResponse {
    match (method, segments) {
        (Method::Post, ["auth", "signup"]) | (Method::Post, ["auth", "signin"]) => {
            if field(body, "email").is_empty() {
                error(400, "email should not be empty")
            } else {
                no_content()
            }
        }
        (Method::Post, ["auth", _, "verify"]) => {
            if field(body, "code") == VALID_CODE {
                let session = session_fixture();
                ok(&json!({ "accessToken": session.access_token, "user": session.user }))
            } else {
                error(400, "Invalid code")
            }
        }
        (Method::Get, ["auth", "github"]) => ok(&json!({ "url": GITHUB_AUTHORIZE_URL })),
        (Method::Post, ["auth", "github", "callback"]) => {
            if field(body, "code") == VALID_CODE {
                let session = session_fixture();
                ok(&json!({ "accessToken": session.access_token, "user": session.user }))
            } else {
                error(400, "bad_verification_code")
            }
        }
        (Method::Get, ["repositories", id, "github-info"]) => {
            match state.repositories.iter().find(|r| r.repository_id == *id) {
                Some(info) => ok(info),
                None => error(404, "repository not linked"),
            }
        }

        (Method::Get, ["boards"]) => ok(&state.boards),
        (Method::Post, ["boards"]) => {
            state.next_id += 1;
            let board = Board {
                id: format!("b{}", state.next_id),
                name: field(body, "name"),
                description: field(body, "description"),
                members: Vec::new(),
            };
            state.boards.push(board.clone());
            created(&board)
        }
        (Method::Get, ["boards", id]) => match state.boards.iter().find(|b| b.id == *id) {
            Some(board) => ok(board),
            None => error(404, "board not found"),
        },
        (Method::Put, ["boards", id]) => match state.boards.iter_mut().find(|b| b.id == *id) {
            Some(board) => {
                board.name = field(body, "name");
                board.description = field(body, "description");
                ok(board)
            }
            None => error(404, "board not found"),
        },
        (Method::Delete, ["boards", id]) => {
            state.boards.retain(|b| b.id != *id);
            no_content()
        }
        (Method::Post, ["boards", _, "invite"]) => {
            state.invites.push(body.clone());
            ok(&json!({ "success": true }))
        }
        (Method::Post, ["boards", id, "invite", "accept"]) => {
            state.invite_responses.push(body.clone());
            if field(body, "status") == "accepted" {
                if let Some(pos) = state.invited_boards.iter().position(|b| b.id == *id) {
                    let board = state.invited_boards.remove(pos);
                    state.boards.push(board);
                }
            }
            ok(&json!({ "success": true }))
        }

        (Method::Get, ["boards", board_id, "cards"]) => {
            let cards: Vec<&Card> = state.cards.iter().filter(|(b, _)| b == board_id).map(|(_, c)| c).collect();
            ok(&cards)
        }
        (Method::Get, ["boards", board_id, "cards", "user", _]) => {
            let cards: Vec<&Card> = state.cards.iter().filter(|(b, _)| b == board_id).map(|(_, c)| c).collect();
            ok(&cards)
        }
        (Method::Post, ["boards", board_id, "cards"]) => {
            state.next_id += 1;
            let card = Card {
                id: format!("c{}", state.next_id),
                name: field(body, "name"),
                description: field(body, "description"),
                task_count: 0,
            };
            state.cards.push((board_id.to_string(), card.clone()));
            created(&card)
        }
        (Method::Get, ["boards", _, "cards", card_id]) => {
            match state.cards.iter().find(|(_, c)| c.id == *card_id) {
                Some((_, card)) => ok(card),
                None => error(404, "card not found"),
            }
        }
        (Method::Put, ["boards", _, "cards", card_id]) => {
            match state.cards.iter_mut().find(|(_, c)| c.id == *card_id) {
                Some((_, card)) => {
                    card.name = field(body, "name");
                    card.description = field(body, "description");
                    ok(card)
                }
                None => error(404, "card not found"),
            }
        }
        (Method::Delete, ["boards", _, "cards", card_id]) => {
            state.cards.retain(|(_, c)| c.id != *card_id);
            state.tasks.retain(|(_, t)| t.card_id != *card_id);
            no_content()
        }

        (Method::Get, ["boards", _, "cards", card_id, "tasks"]) => {
            let tasks: Vec<&Task> = state.tasks.iter().filter(|(_, t)| t.card_id == *card_id).map(|(_, t)| t).collect();
            ok(&tasks)
        }
        (Method::Post, ["boards", board_id, "cards", card_id, "tasks"]) => {
            state.next_id += 1;
            let task = Task {
                id: format!("t{}", state.next_id),
                card_id: card_id.to_string(),
                title: field(body, "title"),
                description: field(body, "description"),
                status: TaskStatus::parse(&field(body, "status")).unwrap_or_default(),
                assigned_members: Vec::new(),
            };
            state.tasks.push((board_id.to_string(), task.clone()));
            created(&task)
        }
        (Method::Get, ["boards", _, "cards", _, "tasks", task_id]) => {
            match state.tasks.iter().find(|(_, t)| t.id == *task_id) {
                Some((_, task)) => ok(task),
                None => error(404, "task not found"),
            }
        }
        (Method::Put, ["boards", _, "cards", _, "tasks", task_id]) => {
            match state.tasks.iter_mut().find(|(_, t)| t.id == *task_id) {
                Some((_, task)) => {
                    task.title = field(body, "title");
                    task.description = field(body, "description");
                    if let Some(status) = TaskStatus::parse(&field(body, "status")) {
                        task.status = status;
                    }
                    let new_card = field(body, "newCardId");
                    if !new_card.is_empty() {
                        task.card_id = new_card;
                    }
                    ok(task)
                }
                None => error(404, "task not found"),
            }
        }
        (Method::Delete, ["boards", _, "cards", _, "tasks", task_id]) => {
            state.tasks.retain(|(_, t)| t.id != *task_id);
            no_content()
        }
        (Method::Get, ["boards", _, "cards", _, "tasks", task_id, "assign"]) => {
            let assigned: Vec<Value> = state
                .tasks
                .iter()
                .filter(|(_, t)| t.id == *task_id)
                .flat_map(|(_, t)| t.assigned_members.iter())
                .map(|m| json!({ "taskId": task_id, "memberId": m.id }))
                .collect();
            ok(&assigned)
        }
        (Method::Post, ["boards", board_id, "cards", _, "tasks", task_id, "assign"]) => {
            let member_id = field(body, "memberId");
            let member = state.members.iter().find(|(b, m)| b == board_id && m.id == member_id).map(|(_, m)| m.clone());
            match (member, state.tasks.iter_mut().find(|(_, t)| t.id == *task_id)) {
                (Some(member), Some((_, task))) => {
                    task.assigned_members.push(member);
                    created(&json!({ "taskId": task_id, "memberId": member_id }))
                }
                _ => error(404, "task or member not found"),
            }
        }
        (Method::Delete, ["boards", _, "cards", _, "tasks", task_id, "assign", member_id]) => {
            if let Some((_, task)) = state.tasks.iter_mut().find(|(_, t)| t.id == *task_id) {
                task.assigned_members.retain(|m| m.id != *member_id);
            }
            no_content()
        }
        (Method::Post, ["boards", _, "cards", _, "tasks", task_id, "github-attach"]) => {
            let kind = match field(body, "type").as_str() {
                "pull_request" => GitHubItemKind::PullRequest,
                "commit" => GitHubItemKind::Commit,
                "issue" => GitHubItemKind::Issue,
                _ => return error(400, "type must be pull_request, commit or issue"),
            };
            state.next_id += 1;
            let attachment = GitHubAttachment {
                attachment_id: format!("a{}", state.next_id),
                kind,
                number: body.get("number").and_then(Value::as_str).map(str::to_string),
                sha: body.get("sha").and_then(Value::as_str).map(str::to_string),
            };
            state.attachments.push((task_id.to_string(), attachment.clone()));
            created(&attachment)
        }
        (Method::Get, ["boards", _, "cards", _, "tasks", task_id, "github-attachments"]) => {
            let attached: Vec<&GitHubAttachment> =
                state.attachments.iter().filter(|(t, _)| t == task_id).map(|(_, a)| a).collect();
            ok(&attached)
        }
        (Method::Delete, ["boards", _, "cards", _, "tasks", task_id, "github-attachments", attachment_id]) => {
            state.attachments.retain(|(t, a)| !(t == task_id && a.attachment_id == *attachment_id));
            no_content()
        }

        (Method::Get, ["boards", board_id, "members"]) => {
            let members: Vec<&Member> = state.members.iter().filter(|(b, _)| b == board_id).map(|(_, m)| m).collect();
            ok(&members)
        }
        (Method::Post, ["boards", board_id, "members"]) => {
            state.next_id += 1;
            let member = Member {
                id: format!("m{}", state.next_id),
                name: field(body, "name"),
                email: field(body, "email"),
                avatar: None,
            };
            state.members.push((board_id.to_string(), member.clone()));
            created(&member)
        }
        (Method::Put, ["boards", board_id, "members", member_id]) => {
            match state.members.iter_mut().find(|(b, m)| b == board_id && m.id == *member_id) {
                Some((_, member)) => {
                    if let Some(name) = body.get("name").and_then(Value::as_str) {
                        member.name = name.to_string();
                    }
                    if let Some(email) = body.get("email").and_then(Value::as_str) {
                        member.email = email.to_string();
                    }
                    ok(member)
                }
                None => error(404, "member not found"),
            }
        }
        (Method::Delete, ["boards", board_id, "members", member_id]) => {
            state.members.retain(|(b, m)| !(b == board_id && m.id == *member_id));
            no_content()
        }

        (Method::Get, ["notifications"]) => ok(&state.notifications),
        (Method::Put, ["notifications", id, "read"]) => {
            match state.notifications.iter_mut().find(|n| n.id == *id) {
                Some(notification) => {
                    notification.read = true;
                    no_content()
                }
                None => error(404, "notification not found"),
            }
        }

        _ => error(404, "no such route"),
    }
}

#[derive(Default)]
struct NavigatorState {
    path: String,
    redirects: Vec<String>,
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    state: Rc<RefCell<NavigatorState>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        let navigator = Self::default();
        navigator.state.borrow_mut().path = path.to_string();
        navigator
    }

    pub fn redirects(&self) -> Vec<String> {
        self.state.borrow().redirects.clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.state.borrow().path.clone()
    }

    fn redirect(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        state.path = path.to_string();
        state.redirects.push(path.to_string());
    }
}

pub struct Harness {
    pub api: ApiClient,
    pub cache: QueryCache,
    pub backend: FakeBackend,
    pub storage: MemoryStorage,
    pub navigator: RecordingNavigator,
}

/// Client, cache and fake backend with the browser sitting at `path`
pub fn harness(path: &str) -> Harness {
    let backend = FakeBackend::new();
    let storage = MemoryStorage::new();
    let navigator = RecordingNavigator::at(path);
    let api = ApiClient::new(
        BASE_URL,
        backend.clone(),
        SessionStore::new(Rc::new(storage.clone())),
        navigator.clone(),
    );
    Harness {
        api,
        cache: QueryCache::new(chrono::Duration::minutes(5)),
        backend,
        storage,
        navigator,
    }
}
