use std::cmp::Ordering;

use clinica_application::{
    Page, RecordRepository, RecordSearch, RecordSort, ScopedQuery, SortDirection, TenantRecord,
};
use clinica_domain::{ClientProfile, ExamProfile, PatientProfile};
use uuid::Uuid;

use super::*;

/// Record types stored by [`InMemoryRepository`].
pub trait InMemoryRecord: TenantRecord {
    /// Returns the table holding records of this type.
    fn table(repository: &InMemoryRepository) -> &RwLock<Vec<Self>>;

    /// Builds a new record.
    fn build(
        record_id: Uuid,
        clinic_id: ClinicId,
        profile: Self::Profile,
        now: DateTime<Utc>,
    ) -> Self;

    /// Replaces the editable attributes.
    fn replace_profile(&mut self, profile: Self::Profile, now: DateTime<Utc>);
}

impl InMemoryRecord for Client {
    fn table(repository: &InMemoryRepository) -> &RwLock<Vec<Self>> {
        &repository.clients
    }

    fn build(record_id: Uuid, clinic_id: ClinicId, profile: ClientProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: record_id,
            clinic_id,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace_profile(&mut self, profile: ClientProfile, now: DateTime<Utc>) {
        self.profile = profile;
        self.updated_at = now;
    }
}

impl InMemoryRecord for Patient {
    fn table(repository: &InMemoryRepository) -> &RwLock<Vec<Self>> {
        &repository.patients
    }

    fn build(record_id: Uuid, clinic_id: ClinicId, profile: PatientProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: record_id,
            clinic_id,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace_profile(&mut self, profile: PatientProfile, now: DateTime<Utc>) {
        self.profile = profile;
        self.updated_at = now;
    }
}

impl InMemoryRecord for Exam {
    fn table(repository: &InMemoryRepository) -> &RwLock<Vec<Self>> {
        &repository.exams
    }

    fn build(record_id: Uuid, clinic_id: ClinicId, profile: ExamProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: record_id,
            clinic_id,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace_profile(&mut self, profile: ExamProfile, now: DateTime<Utc>) {
        self.profile = profile;
        self.updated_at = now;
    }
}

pub(super) fn paginate<T>(items: Vec<T>, search: &RecordSearch) -> Page<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(search.offset()).unwrap_or(usize::MAX);
    let page_items = items
        .into_iter()
        .skip(offset)
        .take(search.page_size as usize)
        .collect();

    Page::new(page_items, search, total)
}

fn compare<R: TenantRecord>(left: &R, right: &R, search: &RecordSearch) -> Ordering {
    let ordering = match search.sort {
        RecordSort::CreatedAt => left.created_at().cmp(&right.created_at()),
        RecordSort::Name => left.display_name().cmp(right.display_name()),
    };
    let ordering = match search.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    ordering.then_with(|| left.id().cmp(&right.id()))
}

#[async_trait]
impl<R: InMemoryRecord> RecordRepository<R> for InMemoryRepository {
    async fn create(&self, scope: &ClinicScope, profile: R::Profile) -> AppResult<R> {
        let record = R::build(Uuid::new_v4(), scope.clinic_id(), profile, Utc::now());
        R::table(self).write().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        scope: &ClinicScope,
        record_id: Uuid,
        profile: R::Profile,
    ) -> AppResult<Option<R>> {
        let mut rows = R::table(self).write().await;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.clinic_id() == scope.clinic_id() && row.id() == record_id)
        else {
            return Ok(None);
        };

        row.replace_profile(profile, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn find(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<Option<R>> {
        Ok(R::table(self)
            .read()
            .await
            .iter()
            .find(|row| row.clinic_id() == scope.clinic_id() && row.id() == record_id)
            .cloned())
    }

    async fn list(&self, query: ScopedQuery<RecordSearch>) -> AppResult<Page<R>> {
        let search = query.filter();
        let mut rows: Vec<R> = R::table(self)
            .read()
            .await
            .iter()
            .filter(|row| row.clinic_id() == query.clinic_id())
            .filter(|row| search.matches(row.display_name()))
            .cloned()
            .collect();
        rows.sort_by(|left, right| compare(left, right, search));

        Ok(paginate(rows, search))
    }

    async fn delete(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<bool> {
        let mut rows = R::table(self).write().await;
        let before = rows.len();
        rows.retain(|row| !(row.clinic_id() == scope.clinic_id() && row.id() == record_id));
        Ok(rows.len() != before)
    }
}
