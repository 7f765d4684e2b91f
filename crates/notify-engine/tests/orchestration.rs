//! End-to-end orchestration scenarios against mocked collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Timelike, Utc};

use notify_core::config::NotifyConfig;
use notify_core::traits::{
    BulkPrinter, DocumentStore, JobScheduler, MarkdownRenderer, PdfLetterService, ProviderClient,
    ProviderFailure, ProviderReceipt,
};
use notify_core::types::{CaseId, EventId};
use notify_core::{ErrorKind, NotifyResult};
use notify_engine::delivery::DeliveryExecutor;
use notify_engine::dispatch::DispatchOrchestrator;
use notify_engine::sender::{CorrespondenceAuditor, NotificationGateway};
use notify_engine::service::NotificationService;
use notify_engine::traits::{CorrespondenceStore, NotificationBuilder};
use notify_entity::case::{
    CaseDocument, CaseSnapshot, CaseState, HearingRoute, HearingType, HistoryEntry, Name,
    OtherParty, PartyDetails, PostalAddress,
};
use notify_entity::correspondence::Correspondence;
use notify_entity::event::{CaseEvent, CaseEventContext, NotifiableEventType};
use notify_entity::job::ResendPayload;
use notify_entity::notification::{Destination, Notification};
use notify_entity::subscription::{PartyType, Subscription, SubscriptionWithType};

#[derive(Debug, Default)]
struct MockProvider {
    email_calls: Mutex<Vec<(String, String)>>,
    sms_calls: Mutex<Vec<(String, String)>>,
    letter_calls: Mutex<Vec<String>>,
    precompiled_calls: Mutex<Vec<CaseId>>,
    email_failure: Mutex<Option<ProviderFailure>>,
    /// Scripted per-call SMS outcomes, consumed front to back; an empty
    /// script accepts everything.
    sms_failures: Mutex<Vec<Option<ProviderFailure>>>,
}

fn receipt() -> ProviderReceipt {
    ProviderReceipt {
        notification_id: uuid::Uuid::new_v4(),
        body: Some("body".into()),
        subject: None,
        from: None,
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    async fn send_email(
        &self,
        template_id: &str,
        to: &str,
        _personalisation: &HashMap<String, String>,
        _reference: &str,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        self.email_calls
            .lock()
            .expect("lock")
            .push((template_id.to_owned(), to.to_owned()));
        if let Some(failure) = self.email_failure.lock().expect("lock").clone() {
            return Err(failure);
        }
        Ok(receipt())
    }

    async fn send_sms(
        &self,
        template_id: &str,
        to: &str,
        _personalisation: &HashMap<String, String>,
        _reference: &str,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        self.sms_calls
            .lock()
            .expect("lock")
            .push((template_id.to_owned(), to.to_owned()));
        let mut failures = self.sms_failures.lock().expect("lock");
        if !failures.is_empty() {
            if let Some(failure) = failures.remove(0) {
                return Err(failure);
            }
        }
        Ok(receipt())
    }

    async fn send_letter(
        &self,
        template_id: &str,
        _personalisation: &HashMap<String, String>,
        _case_id: &CaseId,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        self.letter_calls
            .lock()
            .expect("lock")
            .push(template_id.to_owned());
        Ok(receipt())
    }

    async fn send_precompiled_letter(
        &self,
        case_id: &CaseId,
        _pdf: Bytes,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        self.precompiled_calls
            .lock()
            .expect("lock")
            .push(case_id.clone());
        Ok(receipt())
    }
}

#[derive(Debug, Default)]
struct RecordingScheduler {
    jobs: Mutex<Vec<(String, serde_json::Value, DateTime<Utc>)>>,
}

#[async_trait]
impl JobScheduler for RecordingScheduler {
    async fn schedule(
        &self,
        group_key: &str,
        _event_id: &EventId,
        payload: serde_json::Value,
        fire_at: DateTime<Utc>,
    ) -> NotifyResult<()> {
        self.jobs
            .lock()
            .expect("lock")
            .push((group_key.to_owned(), payload, fire_at));
        Ok(())
    }
}

#[derive(Debug)]
struct FakePdf {
    pages: usize,
}

#[async_trait]
impl PdfLetterService for FakePdf {
    async fn generate_letter(
        &self,
        _template_id: &str,
        _placeholders: &HashMap<String, String>,
    ) -> NotifyResult<Bytes> {
        Ok(Bytes::from_static(b"%PDF-cover"))
    }

    async fn build_coversheet(&self, _case_id: &CaseId, _recipient: &str) -> NotifyResult<Bytes> {
        Ok(Bytes::from_static(b"%PDF-sheet"))
    }

    fn page_count(&self, _pdf: &[u8]) -> NotifyResult<usize> {
        Ok(self.pages)
    }

    fn pad_to_even_pages(&self, pdf: Bytes) -> NotifyResult<Bytes> {
        Ok(pdf)
    }

    fn merge(&self, first: Bytes, second: Bytes) -> NotifyResult<Bytes> {
        let mut merged = first.to_vec();
        merged.extend_from_slice(&second);
        Ok(Bytes::from(merged))
    }
}

#[derive(Debug, Default)]
struct FakeDocuments;

#[async_trait]
impl DocumentStore for FakeDocuments {
    async fn download(&self, _url: &str) -> NotifyResult<Bytes> {
        Ok(Bytes::from_static(b"%PDF-doc"))
    }
}

#[derive(Debug, Default)]
struct RecordingBulkPrinter {
    prints: Mutex<Vec<(CaseId, usize)>>,
}

#[async_trait]
impl BulkPrinter for RecordingBulkPrinter {
    async fn bulk_print(
        &self,
        case_id: &CaseId,
        documents: Vec<Bytes>,
        _recipient: &str,
    ) -> NotifyResult<()> {
        self.prints
            .lock()
            .expect("lock")
            .push((case_id.clone(), documents.len()));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NullStore;

#[async_trait]
impl CorrespondenceStore for NullStore {
    async fn save(&self, _record: &Correspondence) -> NotifyResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct PlainRenderer;

impl MarkdownRenderer for PlainRenderer {
    fn to_display(&self, markup: &str) -> String {
        markup.to_owned()
    }
}

/// Hands out one fixed template set per channel and records what it was
/// asked to build.
#[derive(Debug, Default)]
struct StaticBuilder {
    built: Mutex<Vec<(NotifiableEventType, String)>>,
}

#[async_trait]
impl NotificationBuilder for StaticBuilder {
    async fn build(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
    ) -> NotifyResult<Notification> {
        self.built.lock().expect("lock").push((
            context.event.event_type,
            recipient.party.label().to_owned(),
        ));
        let docmosis = context
            .event
            .event_type
            .is_bundled_letter()
            .then(|| "cover-template".to_owned());
        Ok(Notification {
            destination: Destination {
                email: recipient.subscription.email.clone(),
                mobile: recipient.subscription.mobile.clone(),
            },
            email_template: Some("email-template".into()),
            sms_templates: vec!["sms-template".into()],
            letter_template: Some("letter-template".into()),
            docmosis_template: docmosis,
            placeholders: HashMap::new(),
            reference: context.new.case_id.to_string(),
        })
    }
}

struct Harness {
    provider: Arc<MockProvider>,
    scheduler: Arc<RecordingScheduler>,
    bulk: Arc<RecordingBulkPrinter>,
    builder: Arc<StaticBuilder>,
    service: NotificationService,
}

/// The orchestrator and its mocks without the service layer on top, for
/// scenarios that assert on the per-recipient delivery outcome directly.
struct DispatchHarness {
    provider: Arc<MockProvider>,
    scheduler: Arc<RecordingScheduler>,
    bulk: Arc<RecordingBulkPrinter>,
    orchestrator: DispatchOrchestrator,
}

fn dispatch_harness_with(pages: usize, config: &NotifyConfig) -> DispatchHarness {
    let provider = Arc::new(MockProvider::default());
    let scheduler = Arc::new(RecordingScheduler::default());
    let bulk = Arc::new(RecordingBulkPrinter::default());

    let auditor = CorrespondenceAuditor::new(
        Arc::new(NullStore),
        Arc::new(PlainRenderer),
        config.correspondence.clone(),
        config.window.zone.parse().expect("zone"),
    );
    let gateway = Arc::new(NotificationGateway::new(
        provider.clone(),
        Arc::new(MockProvider::default()),
        config.provider.clone(),
        auditor,
    ));
    let executor = DeliveryExecutor::new(scheduler.clone(), config.retry.clone());
    let orchestrator = DispatchOrchestrator::new(
        gateway,
        executor,
        Arc::new(FakePdf { pages }),
        Arc::new(FakeDocuments),
        bulk.clone(),
        config,
    );
    DispatchHarness {
        provider,
        scheduler,
        bulk,
        orchestrator,
    }
}

fn dispatch_harness(pages: usize) -> DispatchHarness {
    dispatch_harness_with(pages, &always_in_hours())
}

fn harness_with(pages: usize, config: NotifyConfig) -> Harness {
    let builder = Arc::new(StaticBuilder::default());
    let d = dispatch_harness_with(pages, &config);
    let service =
        NotificationService::new(&config, builder.clone(), d.orchestrator, d.scheduler.clone())
            .expect("service");
    Harness {
        provider: d.provider,
        scheduler: d.scheduler,
        bulk: d.bulk,
        builder,
        service,
    }
}

fn always_in_hours() -> NotifyConfig {
    let mut config = NotifyConfig::default();
    config.window.start_hour = 0;
    config.window.end_hour = 24;
    config
}

fn harness(pages: usize) -> Harness {
    harness_with(pages, always_in_hours())
}

fn subscription(email: Option<&str>, mobile: Option<&str>) -> Subscription {
    Subscription {
        email: email.map(str::to_owned),
        mobile: mobile.map(str::to_owned),
        subscribe_email: email.is_some(),
        subscribe_sms: mobile.is_some(),
    }
}

fn case() -> CaseSnapshot {
    CaseSnapshot {
        case_id: "1234567890123456".into(),
        state: CaseState::WithTribunal,
        appellant: PartyDetails {
            name: Name {
                title: None,
                first_name: "Jo".into(),
                last_name: "Bloggs".into(),
            },
            address: PostalAddress {
                line1: Some("1 High St".into()),
                line2: None,
                town: Some("Leeds".into()),
                county: None,
                postcode: Some("LS1 1AA".into()),
            },
        },
        appointee: None,
        representative: None,
        joint_party: None,
        other_parties: vec![],
        appellant_subscription: Some(subscription(Some("jo@example.com"), None)),
        appointee_subscription: None,
        representative_subscription: None,
        joint_party_subscription: None,
        language_preference: Default::default(),
        hearings: vec![],
        hearing_type: HearingType::Oral,
        hearing_route: HearingRoute::ListAssist,
        created_via_digital_route: true,
        final_decision_issued: false,
        original_sender: None,
        audio_video_action: None,
        reissue: None,
        documents: vec![],
        history: vec![],
        information_from_appellant: None,
    }
}

fn ctx(event_type: NotifiableEventType, case: CaseSnapshot) -> CaseEventContext {
    CaseEventContext::new(CaseEvent::new(event_type), case)
}

#[tokio::test]
async fn in_hours_event_sends_email() {
    let h = harness(1);
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::EvidenceReceived, case()), false)
        .await
        .expect("process");
    let emails = h.provider.email_calls.lock().expect("lock");
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].1, "jo@example.com");
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn out_of_hours_event_is_deferred_not_sent() {
    // Pick a one-hour window guaranteed not to contain the current
    // reference-zone hour.
    let london_hour = Utc::now().with_timezone(&chrono_tz::Europe::London).hour();
    let mut config = NotifyConfig::default();
    if london_hour >= 12 {
        config.window.start_hour = 1;
        config.window.end_hour = 2;
    } else {
        config.window.start_hour = 22;
        config.window.end_hour = 23;
    }
    let h = harness_with(1, config);

    let context = ctx(NotifiableEventType::EvidenceReceived, case());
    let event_id = context.event.id;
    h.service
        .manage_notification_and_subscription(context, false)
        .await
        .expect("process");

    assert!(h.provider.email_calls.lock().expect("lock").is_empty());
    let jobs = h.scheduler.jobs.lock().expect("lock");
    assert_eq!(jobs.len(), 1);
    let payload: ResendPayload = serde_json::from_value(jobs[0].1.clone()).expect("payload");
    assert_eq!(payload.retry, 1);
    assert_eq!(payload.event_id, event_id);
}

#[tokio::test]
async fn retry_path_skips_deferral_checks() {
    let london_hour = Utc::now().with_timezone(&chrono_tz::Europe::London).hour();
    let mut config = NotifyConfig::default();
    if london_hour >= 12 {
        config.window.start_hour = 1;
        config.window.end_hour = 2;
    } else {
        config.window.start_hour = 22;
        config.window.end_hour = 23;
    }
    let h = harness_with(1, config);
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::EvidenceReceived, case()), true)
        .await
        .expect("process");
    assert_eq!(h.provider.email_calls.lock().expect("lock").len(), 1);
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn delayed_event_is_deferred_on_the_live_path() {
    let h = harness(1);
    h.service
        .manage_notification_and_subscription(
            ctx(NotifiableEventType::ValidAppealCreated, case()),
            false,
        )
        .await
        .expect("process");
    assert!(h.provider.email_calls.lock().expect("lock").is_empty());
    assert_eq!(h.scheduler.jobs.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn empty_subscription_still_gets_mandatory_letter() {
    let h = harness(1);
    let mut c = case();
    c.appellant_subscription = None;
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::AppealLapsed, c), false)
        .await
        .expect("process");
    assert!(h.provider.email_calls.lock().expect("lock").is_empty());
    assert!(h.provider.sms_calls.lock().expect("lock").is_empty());
    assert_eq!(h.provider.letter_calls.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn bundled_letter_over_page_limit_goes_to_bulk_print_only() {
    let h = harness(11);
    let mut c = case();
    c.documents = vec![CaseDocument {
        document_type: "finalDecisionNotice".into(),
        url: "https://docs/1".into(),
        filename: None,
        added: Some(Utc::now()),
    }];
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::IssueFinalDecision, c), false)
        .await
        .expect("process");
    assert_eq!(h.bulk.prints.lock().expect("lock").len(), 1);
    assert!(h.provider.precompiled_calls.lock().expect("lock").is_empty());
    assert!(h.provider.letter_calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn bundled_letter_under_page_limit_uses_the_provider() {
    let h = harness(4);
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::IssueFinalDecision, case()), false)
        .await
        .expect("process");
    assert_eq!(h.provider.precompiled_calls.lock().expect("lock").len(), 1);
    assert!(h.bulk.prints.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn incomplete_address_skips_letter_without_error() {
    let h = harness(1);
    let mut c = case();
    c.appellant.address.line1 = Some("   ".into());
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::AppealLapsed, c), false)
        .await
        .expect("no error for bad address");
    assert!(h.provider.letter_calls.lock().expect("lock").is_empty());
    assert!(h.provider.precompiled_calls.lock().expect("lock").is_empty());
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn permanent_rejection_is_absorbed_and_never_rescheduled() {
    let h = harness(1);
    *h.provider.email_failure.lock().expect("lock") = Some(ProviderFailure::Rejected {
        status: 400,
        message: "bad request".into(),
    });
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::EvidenceReceived, case()), false)
        .await
        .expect("rejection absorbed");
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn retryable_rejection_reschedules_with_incremented_counter() {
    let h = harness(1);
    *h.provider.email_failure.lock().expect("lock") = Some(ProviderFailure::Rejected {
        status: 500,
        message: "provider down".into(),
    });
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::EvidenceReceived, case()), false)
        .await
        .expect("rescheduled");
    let jobs = h.scheduler.jobs.lock().expect("lock");
    assert_eq!(jobs.len(), 1);
    let payload: ResendPayload = serde_json::from_value(jobs[0].1.clone()).expect("payload");
    assert_eq!(payload.retry, 2);
}

#[tokio::test]
async fn exhausted_retry_budget_surfaces_an_error() {
    let h = harness(1);
    *h.provider.email_failure.lock().expect("lock") = Some(ProviderFailure::Rejected {
        status: 500,
        message: "provider down".into(),
    });
    let context = ctx(NotifiableEventType::EvidenceReceived, case());
    let payload = ResendPayload::new(context.new.case_id.clone(), context.event.id, 0);
    let error = h
        .service
        .process_scheduled(context, &payload)
        .await
        .expect_err("budget exhausted");
    assert_eq!(error.kind, ErrorKind::RetryExhausted);
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn network_failure_surfaces_an_error() {
    let h = harness(1);
    *h.provider.email_failure.lock().expect("lock") =
        Some(ProviderFailure::Network("no route to host".into()));
    let error = h
        .service
        .manage_notification_and_subscription(ctx(NotifiableEventType::EvidenceReceived, case()), false)
        .await
        .expect_err("network failure raised");
    assert_eq!(error.kind, ErrorKind::TransientNetwork);
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn subscription_update_resends_previous_event_to_new_channel_only() {
    let h = harness(1);
    let mut old = case();
    old.appellant_subscription = Some(Subscription {
        email: Some("a@example.com".into()),
        mobile: None,
        subscribe_email: false,
        subscribe_sms: false,
    });
    let mut new = case();
    new.appellant_subscription = Some(subscription(Some("a@example.com"), None));
    new.history = vec![HistoryEntry {
        event_id: "appealReceived".into(),
        date: Utc::now(),
    }];
    let context = ctx(NotifiableEventType::SubscriptionUpdated, new).with_old(old);
    h.service
        .manage_notification_and_subscription(context, false)
        .await
        .expect("process");

    let built = h.builder.built.lock().expect("lock");
    assert!(built
        .iter()
        .any(|(event, _)| *event == NotifiableEventType::SubscriptionUpdated));
    assert!(built
        .iter()
        .any(|(event, _)| *event == NotifiableEventType::AppealReceived));

    let emails = h.provider.email_calls.lock().expect("lock");
    assert_eq!(emails.len(), 2);
    assert!(emails.iter().all(|(_, to)| to == "a@example.com"));
    assert!(h.provider.sms_calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn subscription_update_echoes_to_the_old_email() {
    let h = harness(1);
    let mut old = case();
    old.appellant_subscription = Some(subscription(Some("old@example.com"), None));
    let mut new = case();
    new.appellant_subscription = Some(subscription(Some("new@example.com"), None));
    new.history = vec![HistoryEntry {
        event_id: "subscriptionUpdated".into(),
        date: Utc::now(),
    }];
    let context = ctx(NotifiableEventType::SubscriptionUpdated, new).with_old(old);
    h.service
        .manage_notification_and_subscription(context, false)
        .await
        .expect("process");

    let emails = h.provider.email_calls.lock().expect("lock");
    assert_eq!(emails.len(), 2);
    assert!(emails.iter().any(|(_, to)| to == "new@example.com"));
    assert!(emails
        .iter()
        .any(|(template, to)| to == "old@example.com"
            && template == "subscription-updated-old-email"));
}

#[tokio::test]
async fn welsh_case_drops_excluded_event_entirely() {
    let h = harness(1);
    let mut c = case();
    c.language_preference = notify_entity::case::LanguagePreference::Welsh;
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::HearingReminder, c), false)
        .await
        .expect("process");
    assert!(h.provider.email_calls.lock().expect("lock").is_empty());
    assert!(h.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn reissue_goes_only_to_flagged_parties() {
    let h = harness(2);
    let mut c = case();
    c.reissue = Some(notify_entity::case::ReissueSelection {
        document_code: "issueFinalDecision".into(),
        resend_to_appellant: true,
        resend_to_representative: false,
        other_party_resend_ids: vec![],
    });
    c.representative = Some(PartyDetails {
        name: Name {
            title: None,
            first_name: "Ray".into(),
            last_name: "Presenter".into(),
        },
        address: c.appellant.address.clone(),
    });
    c.representative_subscription = Some(subscription(Some("rep@example.com"), None));
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::ReissueDocument, c), false)
        .await
        .expect("process");

    // Only the appellant's bundled letter goes out.
    assert_eq!(h.provider.precompiled_calls.lock().expect("lock").len(), 1);
    let emails = h.provider.email_calls.lock().expect("lock");
    assert!(emails.iter().all(|(_, to)| to != "rep@example.com"));
}

#[tokio::test]
async fn upload_response_notifies_flagged_other_parties_of_the_data_change() {
    let h = harness(1);
    let mut c = case();
    c.other_parties = vec![OtherParty {
        id: "op1".into(),
        details: PartyDetails {
            name: Name {
                title: None,
                first_name: "Pat".into(),
                last_name: "Smith".into(),
            },
            address: c.appellant.address.clone(),
        },
        appointee: None,
        representative: None,
        subscription: Some(subscription(Some("op@example.com"), None)),
        send_new_notification: true,
    }];
    // The upload-response event carries a fixed delay, so drive the retry
    // path the scheduler would take.
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::DwpUploadResponse, c), true)
        .await
        .expect("process");

    let built = h.builder.built.lock().expect("lock");
    assert!(built
        .iter()
        .any(|(event, party)| *event == NotifiableEventType::DwpUploadResponse
            && party == "appellant"));
    let follow_ups: Vec<_> = built
        .iter()
        .filter(|(event, _)| *event == NotifiableEventType::UpdateOtherPartyData)
        .collect();
    assert!(!follow_ups.is_empty());
    assert!(follow_ups.iter().all(|(_, party)| party == "otherParty"));

    // The flagged other party hears about the upload and then about the
    // data change; the appellant only hears about the upload.
    let emails = h.provider.email_calls.lock().expect("lock");
    assert_eq!(emails.iter().filter(|(_, to)| to == "op@example.com").count(), 2);
    assert_eq!(emails.iter().filter(|(_, to)| to == "jo@example.com").count(), 1);
}

#[tokio::test]
async fn interlocutory_letter_goes_out_on_paper_pathway_cases() {
    let h = harness(1);
    let mut c = case();
    c.created_via_digital_route = false;
    c.appellant_subscription = None;
    c.information_from_appellant = Some("yes".into());
    h.service
        .manage_notification_and_subscription(
            ctx(NotifiableEventType::RequestForInformation, c),
            false,
        )
        .await
        .expect("process");
    assert_eq!(h.provider.letter_calls.lock().expect("lock").len(), 1);
    assert!(h.provider.precompiled_calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn standard_letter_requires_the_digital_pathway() {
    let h = harness(1);
    let mut c = case();
    c.created_via_digital_route = false;
    c.appellant_subscription = None;
    h.service
        .manage_notification_and_subscription(ctx(NotifiableEventType::AppealLapsed, c), false)
        .await
        .expect("process");
    assert!(h.provider.letter_calls.lock().expect("lock").is_empty());
    assert!(h.provider.precompiled_calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn sms_counts_as_sent_only_when_every_part_is_accepted() {
    let d = dispatch_harness(1);
    *d.provider.sms_failures.lock().expect("lock") = vec![
        None,
        Some(ProviderFailure::Rejected {
            status: 400,
            message: "bad part".into(),
        }),
    ];
    let context = ctx(NotifiableEventType::EvidenceReceived, case());
    let recipient = SubscriptionWithType::new(
        subscription(None, Some("07700900000")),
        PartyType::Appellant,
    );
    let notification = Notification {
        destination: Destination {
            email: None,
            mobile: Some("07700900000".into()),
        },
        sms_templates: vec!["sms-part-1".into(), "sms-part-2".into()],
        reference: "ref".into(),
        ..Default::default()
    };
    let outcome = d
        .orchestrator
        .dispatch(&context, &recipient, &notification, 1)
        .await
        .expect("dispatch");
    assert!(!outcome.sms_sent);
    assert_eq!(outcome.receipts.len(), 1);
    assert_eq!(d.provider.sms_calls.lock().expect("lock").len(), 2);
    assert!(d.scheduler.jobs.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn blank_cover_template_uses_the_plain_letter_path() {
    let d = dispatch_harness(1);
    let context = ctx(NotifiableEventType::AppealLapsed, case());
    let recipient = SubscriptionWithType::new(subscription(None, None), PartyType::Appellant);
    let notification = Notification {
        letter_template: Some("letter-template".into()),
        docmosis_template: Some(String::new()),
        reference: "ref".into(),
        ..Default::default()
    };
    let outcome = d
        .orchestrator
        .dispatch(&context, &recipient, &notification, 1)
        .await
        .expect("dispatch");
    assert!(outcome.letter_sent);
    assert_eq!(d.provider.letter_calls.lock().expect("lock").len(), 1);
    assert!(d.provider.precompiled_calls.lock().expect("lock").is_empty());
    assert!(d.bulk.prints.lock().expect("lock").is_empty());
}
