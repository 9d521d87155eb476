//! In-memory backend for testing.
//!
//! Enforces the same rules as the real backend (roles, ownership, the
//! enrollment lifecycle, capacity) so view workflows can be exercised end to
//! end without a server. Every call is recorded for assertions such as
//! "no update request was sent".

use crate::clock::test_clock;
use chrono::{Duration, NaiveDateTime};
use eventos_client::{
    ApiError, AuthToken, CreateEnrollmentRequest, CreateEventRequest, CreateUserRequest,
    EventosBackend, LoginRequest, LoginResponse, PageRequest, Result, UpdateEventRequest,
    UpdateUserRequest,
};
use eventos_core::capacity::is_full;
use eventos_core::environment::Clock;
use eventos_core::lifecycle::{check_transition, Actor, Transition};
use eventos_core::types::{
    Enrollment, EnrollmentId, EnrollmentStatus, Event, EventId, Page, Role, User, UserId,
};
use eventos_core::LifecycleError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Ledger {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    events: Vec<Event>,
    enrollments: Vec<Enrollment>,
    calls: Vec<&'static str>,
    failures: Vec<ApiError>,
    next_token: u64,
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized {
        message: "Token inválido ou expirado".to_string(),
    }
}

fn forbidden(message: &str) -> ApiError {
    ApiError::Forbidden {
        message: message.to_string(),
    }
}

fn not_found(message: &str) -> ApiError {
    ApiError::NotFound {
        message: message.to_string(),
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        status: 400,
        message: message.to_string(),
    }
}

fn lifecycle_refusal(err: &LifecycleError) -> ApiError {
    if err.is_authorization() {
        forbidden(&err.to_string())
    } else {
        ApiError::Conflict {
            message: err.to_string(),
        }
    }
}

impl Ledger {
    fn issue_token(&mut self, user_id: UserId) -> AuthToken {
        self.next_token += 1;
        let token = format!("token-{}", self.next_token);
        self.tokens.insert(token.clone(), user_id);
        AuthToken::new(token)
    }

    fn caller(&self, token: &AuthToken) -> Result<User> {
        let id = self.tokens.get(token.as_str()).ok_or_else(unauthorized)?;
        self.user(*id).ok_or_else(unauthorized)
    }

    fn account_mut(&mut self, id: UserId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.user.id == id)
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.accounts
            .iter()
            .find(|a| a.user.id == id)
            .map(|a| a.user.clone())
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(email) && Some(a.user.id) != except)
    }

    fn confirmed_count(&self, event_id: EventId) -> u32 {
        let count = self
            .enrollments
            .iter()
            .filter(|e| e.event_id == event_id && e.status == EnrollmentStatus::Confirmed)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// The event as the backend reports it, with a live confirmed count.
    fn event(&self, id: EventId) -> Option<Event> {
        self.events.iter().find(|e| e.id == id).map(|event| Event {
            current_enrollments: self.confirmed_count(event.id),
            ..event.clone()
        })
    }

    fn events_where(&self, keep: impl Fn(&Event) -> bool) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| keep(e))
            .filter_map(|e| self.event(e.id))
            .collect()
    }

    fn owned_event(&self, caller: &User, id: EventId) -> Result<Event> {
        let event = self.event(id).ok_or_else(|| not_found("Evento não encontrado"))?;
        if event.is_owned_by(caller.id) {
            Ok(event)
        } else {
            Err(forbidden("Apenas o organizador pode gerenciar este evento"))
        }
    }

    fn enrollment_index(&self, id: EnrollmentId) -> Result<usize> {
        self.enrollments
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_found("Inscrição não encontrada"))
    }

    fn enroll(&mut self, participant: &User, event: &Event, status: EnrollmentStatus, at: NaiveDateTime) -> Enrollment {
        let enrollment = Enrollment {
            id: EnrollmentId::new(),
            event_id: event.id,
            event_title: Some(event.title.clone()),
            event_start_date_time: Some(event.start_date_time),
            event_location: Some(event.location.clone()),
            participant_id: participant.id,
            participant_name: Some(participant.name.clone()),
            participant_email: Some(participant.email.clone()),
            status,
            enrollment_date: at,
        };
        self.enrollments.push(enrollment.clone());
        enrollment
    }

    fn transition(&mut self, token: &AuthToken, id: EnrollmentId, transition: Transition) -> Result<Enrollment> {
        let caller = self.caller(token)?;
        let index = self.enrollment_index(id)?;
        let enrollment = self.enrollments[index].clone();
        let event = self
            .event(enrollment.event_id)
            .ok_or_else(|| not_found("Evento não encontrado"))?;

        let next = check_transition(Actor::from(&caller), transition, &enrollment, event.organizer_id)
            .map_err(|err| lifecycle_refusal(&err))?;

        if transition == Transition::Confirm && is_full(&event) {
            return Err(rejected("Evento lotado - não é possível confirmar inscrição"));
        }

        self.enrollments[index].status = next;
        Ok(self.enrollments[index].clone())
    }
}

/// In-memory stand-in for the Eventos backend.
///
/// Clones share state, so a test can keep a handle while the views own
/// another one.
#[derive(Clone)]
pub struct InMemoryBackend {
    ledger: Arc<Mutex<Ledger>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend").finish_non_exhaustive()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create an empty backend using the fixed test clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(test_clock())
    }

    /// Create an empty backend with the given clock.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::default())),
            clock: Arc::new(clock),
        }
    }

    // Seeding and inspection never fail; a poisoned lock only means a test
    // already panicked.
    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now().naive_utc()
    }

    /// Run one backend operation, recording it and honoring injected failures.
    fn call<T, F>(&self, name: &'static str, op: F) -> impl Future<Output = Result<T>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce(&mut Ledger, NaiveDateTime) -> Result<T> + Send + 'static,
    {
        let ledger = Arc::clone(&self.ledger);
        let now = self.now();

        async move {
            let mut guard = ledger.lock().map_err(|_| ApiError::Server {
                status: 500,
                message: "Mutex lock failed".to_string(),
            })?;
            guard.calls.push(name);
            if !guard.failures.is_empty() {
                return Err(guard.failures.remove(0));
            }
            op(&mut guard, now)
        }
    }

    /// Register an account directly.
    pub fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: Some(self.now()),
        };
        self.ledger().accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Create an event owned by `organizer`, starting 30 days from the clock.
    pub fn seed_event(&self, organizer: &User, title: &str, capacity: u32) -> Event {
        let start = self.now() + Duration::days(30);
        let event = Event {
            id: EventId::new(),
            title: title.to_string(),
            description: format!("{title} description"),
            start_date_time: start,
            end_date_time: start + Duration::hours(3),
            location: "Lisboa".to_string(),
            capacity,
            organizer_id: organizer.id,
            organizer_name: Some(organizer.name.clone()),
            current_enrollments: 0,
            is_active: Some(true),
            created_at: Some(self.now()),
        };
        self.ledger().events.push(event.clone());
        event
    }

    /// Add an enrollment in any status, bypassing the lifecycle rules.
    pub fn seed_enrollment(&self, participant: &User, event: &Event, status: EnrollmentStatus) -> Enrollment {
        let now = self.now();
        self.ledger().enroll(participant, event, status, now)
    }

    /// Issue a credential for `user` without a login call.
    pub fn token_for(&self, user: &User) -> AuthToken {
        self.ledger().issue_token(user.id)
    }

    /// Change an enrollment's status as another session would.
    pub fn set_enrollment_status(&self, id: EnrollmentId, status: EnrollmentStatus) {
        if let Some(enrollment) = self.ledger().enrollments.iter_mut().find(|e| e.id == id) {
            enrollment.status = status;
        }
    }

    /// Make the next call fail with `error`, whatever it is.
    pub fn fail_next_call(&self, error: ApiError) {
        self.ledger().failures.push(error);
    }

    /// The stored event, with its live confirmed count.
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<Event> {
        self.ledger().event(id)
    }

    /// The stored enrollment.
    #[must_use]
    pub fn enrollment(&self, id: EnrollmentId) -> Option<Enrollment> {
        self.ledger().enrollments.iter().find(|e| e.id == id).cloned()
    }

    /// Every enrollment of `participant` in `event`, oldest first.
    #[must_use]
    pub fn enrollments_of(&self, participant: UserId, event: EventId) -> Vec<Enrollment> {
        self.ledger()
            .enrollments
            .iter()
            .filter(|e| e.participant_id == participant && e.event_id == event)
            .cloned()
            .collect()
    }

    /// The stored user.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        self.ledger().user(id)
    }

    /// Names of the calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.ledger().calls.clone()
    }

    /// Whether a call named `name` was received.
    #[must_use]
    pub fn received(&self, name: &str) -> bool {
        self.ledger().calls.iter().any(|call| *call == name)
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.ledger().calls.clear();
    }
}

impl EventosBackend for InMemoryBackend {
    fn login(&self, credentials: &LoginRequest) -> impl Future<Output = Result<LoginResponse>> + Send {
        let credentials = credentials.clone();

        self.call("login", move |ledger, _| {
            let user = ledger
                .accounts
                .iter()
                .find(|a| {
                    a.user.email.eq_ignore_ascii_case(&credentials.email)
                        && a.password == credentials.password
                })
                .map(|a| a.user.clone())
                .ok_or_else(|| ApiError::Unauthorized {
                    message: "Email ou senha inválidos".to_string(),
                })?;
            let token = ledger.issue_token(user.id);
            Ok(LoginResponse { token, user })
        })
    }

    fn create_user(&self, request: &CreateUserRequest) -> impl Future<Output = Result<User>> + Send {
        let request = request.clone();

        self.call("create_user", move |ledger, now| {
            if ledger.email_taken(&request.email, None) {
                return Err(rejected("Email já está em uso"));
            }
            let user = User {
                id: UserId::new(),
                name: request.name,
                email: request.email,
                role: request.role,
                created_at: Some(now),
            };
            ledger.accounts.push(Account {
                user: user.clone(),
                password: request.password,
            });
            Ok(user)
        })
    }

    fn get_user(&self, token: &AuthToken, id: UserId) -> impl Future<Output = Result<User>> + Send {
        let token = token.clone();

        self.call("get_user", move |ledger, _| {
            ledger.caller(&token)?;
            ledger.user(id).ok_or_else(|| not_found("Usuário não encontrado"))
        })
    }

    fn update_user(
        &self,
        token: &AuthToken,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> impl Future<Output = Result<User>> + Send {
        let token = token.clone();
        let request = request.clone();

        self.call("update_user", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            if caller.id != id {
                return Err(forbidden("Você só pode alterar o próprio perfil"));
            }
            if let Some(email) = &request.email {
                if ledger.email_taken(email, Some(id)) {
                    return Err(rejected("Email já está em uso"));
                }
            }
            let account = ledger
                .account_mut(id)
                .ok_or_else(|| not_found("Usuário não encontrado"))?;
            if let Some(name) = request.name {
                account.user.name = name;
            }
            if let Some(email) = request.email {
                account.user.email = email;
            }
            if let Some(password) = request.password {
                account.password = password;
            }
            Ok(account.user.clone())
        })
    }

    fn delete_user(&self, token: &AuthToken, id: UserId) -> impl Future<Output = Result<()>> + Send {
        let token = token.clone();

        self.call("delete_user", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            if caller.id != id {
                return Err(forbidden("Você só pode excluir a própria conta"));
            }
            ledger.accounts.retain(|a| a.user.id != id);
            ledger.tokens.retain(|_, user| *user != id);
            Ok(())
        })
    }

    fn check_email_availability(&self, email: &str) -> impl Future<Output = Result<bool>> + Send {
        let email = email.to_string();

        self.call("check_email_availability", move |ledger, _| {
            Ok(!ledger.email_taken(&email, None))
        })
    }

    fn validate_password(
        &self,
        token: &AuthToken,
        id: UserId,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send {
        let token = token.clone();
        let password = password.to_string();

        self.call("validate_password", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            if caller.id != id {
                return Err(forbidden("Acesso negado"));
            }
            Ok(ledger
                .accounts
                .iter()
                .any(|a| a.user.id == id && a.password == password))
        })
    }

    fn create_event(
        &self,
        token: &AuthToken,
        request: &CreateEventRequest,
    ) -> impl Future<Output = Result<Event>> + Send {
        let token = token.clone();
        let request = request.clone();

        self.call("create_event", move |ledger, now| {
            let caller = ledger.caller(&token)?;
            if caller.role != Role::Organizer {
                return Err(forbidden("Apenas organizadores podem criar eventos"));
            }
            let event = Event {
                id: EventId::new(),
                title: request.title,
                description: request.description,
                start_date_time: request.start_date_time,
                end_date_time: request.end_date_time,
                location: request.location,
                capacity: request.capacity,
                organizer_id: caller.id,
                organizer_name: Some(caller.name),
                current_enrollments: 0,
                is_active: Some(true),
                created_at: Some(now),
            };
            ledger.events.push(event.clone());
            Ok(event)
        })
    }

    fn get_event(&self, token: &AuthToken, id: EventId) -> impl Future<Output = Result<Event>> + Send {
        let token = token.clone();

        self.call("get_event", move |ledger, _| {
            ledger.caller(&token)?;
            ledger.event(id).ok_or_else(|| not_found("Evento não encontrado"))
        })
    }

    fn update_event(
        &self,
        token: &AuthToken,
        id: EventId,
        request: &UpdateEventRequest,
    ) -> impl Future<Output = Result<Event>> + Send {
        let token = token.clone();
        let request = request.clone();

        self.call("update_event", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            ledger.owned_event(&caller, id)?;
            if let Some(event) = ledger.events.iter_mut().find(|e| e.id == id) {
                if let Some(title) = request.title {
                    event.title = title;
                }
                if let Some(description) = request.description {
                    event.description = description;
                }
                if let Some(start) = request.start_date_time {
                    event.start_date_time = start;
                }
                if let Some(end) = request.end_date_time {
                    event.end_date_time = end;
                }
                if let Some(location) = request.location {
                    event.location = location;
                }
                if let Some(capacity) = request.capacity {
                    event.capacity = capacity;
                }
            }
            ledger.event(id).ok_or_else(|| not_found("Evento não encontrado"))
        })
    }

    fn delete_event(&self, token: &AuthToken, id: EventId) -> impl Future<Output = Result<()>> + Send {
        let token = token.clone();

        self.call("delete_event", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            ledger.owned_event(&caller, id)?;
            ledger.events.retain(|e| e.id != id);
            ledger.enrollments.retain(|e| e.event_id != id);
            Ok(())
        })
    }

    fn list_events(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Event>>> + Send {
        let token = token.clone();

        self.call("list_events", move |ledger, _| {
            ledger.caller(&token)?;
            let events = ledger.events_where(|e| e.is_active != Some(false));
            Ok(Page::from_items(events, page.page, page.size))
        })
    }

    fn search_events(
        &self,
        token: &AuthToken,
        query: &str,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Event>>> + Send {
        let token = token.clone();
        let query = query.to_lowercase();

        self.call("search_events", move |ledger, _| {
            ledger.caller(&token)?;
            let events = ledger.events_where(|e| {
                e.is_active != Some(false)
                    && (e.title.to_lowercase().contains(&query)
                        || e.location.to_lowercase().contains(&query))
            });
            Ok(Page::from_items(events, page.page, page.size))
        })
    }

    fn my_events(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Event>>> + Send {
        let token = token.clone();

        self.call("my_events", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            if caller.role != Role::Organizer {
                return Err(forbidden("Apenas organizadores possuem eventos"));
            }
            let events = ledger.events_where(|e| e.is_owned_by(caller.id));
            Ok(Page::from_items(events, page.page, page.size))
        })
    }

    fn create_enrollment(
        &self,
        token: &AuthToken,
        request: &CreateEnrollmentRequest,
    ) -> impl Future<Output = Result<Enrollment>> + Send {
        let token = token.clone();
        let event_id = request.event_id;

        self.call("create_enrollment", move |ledger, now| {
            let caller = ledger.caller(&token)?;
            if caller.role != Role::Participant {
                return Err(forbidden("Apenas participantes podem se inscrever"));
            }
            let event = ledger
                .event(event_id)
                .ok_or_else(|| not_found("Evento não encontrado"))?;
            if event.is_active == Some(false) {
                return Err(rejected("Evento não está ativo"));
            }
            let already = ledger
                .enrollments
                .iter()
                .any(|e| e.event_id == event_id && e.participant_id == caller.id && e.is_active());
            if already {
                return Err(rejected("Usuário já está inscrito neste evento"));
            }
            if is_full(&event) {
                return Err(rejected("Evento lotado - sem vagas disponíveis"));
            }
            Ok(ledger.enroll(&caller, &event, EnrollmentStatus::Pending, now))
        })
    }

    fn my_enrollments(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Enrollment>>> + Send {
        let token = token.clone();

        self.call("my_enrollments", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            let mine = ledger
                .enrollments
                .iter()
                .filter(|e| e.is_owned_by(caller.id))
                .cloned()
                .collect();
            Ok(Page::from_items(mine, page.page, page.size))
        })
    }

    fn event_enrollments(
        &self,
        token: &AuthToken,
        event_id: EventId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Enrollment>>> + Send {
        let token = token.clone();

        self.call("event_enrollments", move |ledger, _| {
            let caller = ledger.caller(&token)?;
            ledger.owned_event(&caller, event_id)?;
            let enrollments = ledger
                .enrollments
                .iter()
                .filter(|e| e.event_id == event_id)
                .cloned()
                .collect();
            Ok(Page::from_items(enrollments, page.page, page.size))
        })
    }

    fn cancel_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Option<Enrollment>>> + Send {
        let token = token.clone();

        self.call("cancel_enrollment", move |ledger, _| {
            ledger.transition(&token, id, Transition::Cancel).map(Some)
        })
    }

    fn confirm_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Enrollment>> + Send {
        let token = token.clone();

        self.call("confirm_enrollment", move |ledger, _| {
            ledger.transition(&token, id, Transition::Confirm)
        })
    }

    fn reject_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Enrollment>> + Send {
        let token = token.clone();

        self.call("reject_enrollment", move |ledger, _| {
            ledger.transition(&token, id, Transition::Reject)
        })
    }
}
