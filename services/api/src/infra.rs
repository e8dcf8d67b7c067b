use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use gym_desk::config::MembershipConfig;
use gym_desk::store::MemoryStore;
use gym_desk::workflows::calendar::CalendarService;
use gym_desk::workflows::enrollment::EnrollmentService;
use gym_desk::workflows::members::MemberService;
use gym_desk::workflows::training::TrainingService;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every workflow service wired to one shared store.
pub(crate) struct GymServices {
    pub(crate) members: Arc<MemberService<MemoryStore>>,
    pub(crate) enrollment: Arc<EnrollmentService<MemoryStore>>,
    pub(crate) training: Arc<TrainingService<MemoryStore>>,
    pub(crate) calendar: Arc<CalendarService<MemoryStore>>,
}

impl GymServices {
    pub(crate) fn in_memory(membership: MembershipConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            members: Arc::new(MemberService::new(store.clone(), membership)),
            enrollment: Arc::new(EnrollmentService::new(store.clone())),
            training: Arc::new(TrainingService::new(store.clone())),
            calendar: Arc::new(CalendarService::new(store)),
        }
    }
}
