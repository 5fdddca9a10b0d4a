use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    docstatus::DocStatus,
    dto::payroll::{CreatePayrollEntryRequest, PayrollEntryDocument},
    entities::{
        employee, payroll_employee_detail, payroll_entry, payroll_payment_entry, salary_component,
        salary_component_account, salary_slip, salary_slip_detail, salary_structure_assignment,
        salary_structure_component,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    jobs::{Job, JobQueue},
    payroll::{
        period::{end_date, period_containing},
        slip::{compute_totals, consolidate_payments, missing_component_accounts, ComponentAmount},
        BatchOutcome, PayrollRunOptions, PayrollStatus,
    },
};

/// Drives a payroll entry through slip creation, submission and payment.
///
/// Slip batches run either inside the calling request or on the background
/// worker, as chosen per call through [`PayrollRunOptions`]. A failing
/// employee never rolls back slips that were already written for others.
#[derive(Clone)]
pub struct PayrollEntryService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
    job_queue: Option<Arc<dyn JobQueue>>,
    defaults: PayrollRunOptions,
}

impl PayrollEntryService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Option<EventSender>,
        job_queue: Option<Arc<dyn JobQueue>>,
        defaults: PayrollRunOptions,
    ) -> Self {
        Self {
            db,
            event_sender,
            job_queue,
            defaults,
        }
    }

    /// Options used when a call does not override them.
    pub fn defaults(&self) -> PayrollRunOptions {
        self.defaults
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(event).await;
        }
    }

    #[instrument(skip(self, request), fields(company = %request.company))]
    pub async fn create(
        &self,
        request: CreatePayrollEntryRequest,
    ) -> Result<payroll_entry::Model, ServiceError> {
        request.validate()?;

        let end = match request.end_date {
            Some(end) => end,
            None => end_date(request.start_date, request.payroll_frequency)
                .or_else(|| {
                    period_containing(request.payroll_frequency, request.start_date)
                        .map(|p| p.end_date)
                })
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "Cannot derive an end date from {}",
                        request.start_date
                    ))
                })?,
        };

        let entry = payroll_entry::ActiveModel {
            company: Set(request.company),
            posting_date: Set(request.posting_date),
            start_date: Set(request.start_date),
            end_date: Set(end),
            payroll_frequency: Set(request.payroll_frequency),
            branch: Set(request.branch),
            department: Set(request.department),
            payroll_payable_account: Set(request.payroll_payable_account),
            payment_account: Set(request.payment_account),
            currency: Set(request.currency),
            exchange_rate: Set(request.exchange_rate.unwrap_or(Decimal::ONE)),
            cost_center: Set(request.cost_center),
            number_of_employees: Set(0),
            salary_slips_created: Set(false),
            salary_slips_submitted: Set(false),
            error_message: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        counter!("payroll_entry.created", 1);
        info!(payroll_entry_id = %entry.id, "Payroll entry created");
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<PayrollEntryDocument, ServiceError> {
        let db = &*self.db;
        let entry = find_entry(db, id).await?;
        let employees = employee_rows(db, id).await?;
        Ok(PayrollEntryDocument { entry, employees })
    }

    /// Fills the employee table with everyone payable in the period.
    #[instrument(skip(self))]
    pub async fn fill_employee_details(
        &self,
        id: Uuid,
    ) -> Result<PayrollEntryDocument, ServiceError> {
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, id).await?;
        if !entry.docstatus.is_draft() {
            return Err(ServiceError::InvalidStatus(format!(
                "Payroll Entry {} is no longer a draft",
                id
            )));
        }

        let mut query = employee::Entity::find()
            .filter(employee::Column::Company.eq(entry.company.clone()))
            .filter(employee::Column::Status.eq(employee::EmployeeStatus::Active));
        if let Some(branch) = entry.branch.clone().filter(|b| !b.is_empty()) {
            query = query.filter(employee::Column::Branch.eq(branch));
        }
        if let Some(department) = entry.department.clone().filter(|d| !d.is_empty()) {
            query = query.filter(employee::Column::Department.eq(department));
        }
        let candidates = query.order_by_asc(employee::Column::Name).all(&txn).await?;

        let with_structure: HashSet<String> = salary_structure_assignment::Entity::find()
            .filter(salary_structure_assignment::Column::Company.eq(entry.company.clone()))
            .filter(salary_structure_assignment::Column::Docstatus.eq(DocStatus::Submitted))
            .filter(salary_structure_assignment::Column::FromDate.lte(entry.end_date))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a| a.employee)
            .collect();

        let employees: Vec<employee::Model> = candidates
            .into_iter()
            .filter(|e| e.is_payable(entry.start_date, entry.end_date))
            .filter(|e| with_structure.contains(&e.name))
            .collect();

        if employees.is_empty() {
            return Err(ServiceError::ValidationError(
                "No employees found for the selected criteria".to_string(),
            ));
        }

        payroll_employee_detail::Entity::delete_many()
            .filter(payroll_employee_detail::Column::PayrollEntry.eq(id))
            .exec(&txn)
            .await?;
        for (position, employee) in employees.iter().enumerate() {
            payroll_employee_detail::ActiveModel {
                id: Set(Uuid::new_v4()),
                payroll_entry: Set(id),
                idx: Set(position as i32 + 1),
                employee: Set(employee.name.clone()),
                employee_name: Set(employee.employee_name.clone()),
                department: Set(employee.department.clone()),
            }
            .insert(&txn)
            .await?;
        }

        let mut active: payroll_entry::ActiveModel = entry.into();
        active.number_of_employees = Set(employees.len() as i32);
        let entry = active.update(&txn).await?;
        let rows = employee_rows(&txn, id).await?;
        txn.commit().await?;

        info!(payroll_entry_id = %id, employees = rows.len(), "Employee details filled");
        Ok(PayrollEntryDocument {
            entry,
            employees: rows,
        })
    }

    /// Submits the entry and creates salary slips, now or on the worker.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        id: Uuid,
        options: PayrollRunOptions,
    ) -> Result<payroll_entry::Model, ServiceError> {
        let db = &*self.db;
        let entry = find_entry(db, id).await?;
        if !entry.docstatus.is_draft() {
            return Err(ServiceError::InvalidStatus(format!(
                "Payroll Entry {} is already submitted",
                id
            )));
        }
        let employees = employee_rows(db, id).await?;
        if employees.is_empty() {
            return Err(ServiceError::ValidationError(
                "Payroll Entry has no employees; fill employee details first".to_string(),
            ));
        }

        let defer = options.should_defer(employees.len());
        let next = if defer {
            PayrollStatus::Queued
        } else {
            PayrollStatus::Submitted
        };
        let status = entry.status.transition(next)?;
        if defer {
            self.require_queue()?;
        }

        let mut active: payroll_entry::ActiveModel = entry.into();
        active.docstatus = Set(DocStatus::Submitted);
        active.status = Set(status);
        let entry = active.update(db).await?;

        counter!("payroll_entry.submitted", 1);
        self.emit(Event::PayrollEntrySubmitted(id)).await;

        if defer {
            let entry = self
                .enqueue_or_fail(
                    entry,
                    Job::CreateSalarySlips {
                        payroll_entry_id: id,
                    },
                )
                .await?;
            info!(payroll_entry_id = %id, employees = employees.len(), "Salary slip creation queued");
            self.emit(Event::PayrollEntryQueued(id)).await;
            return Ok(entry);
        }

        self.create_salary_slips(id).await
    }

    /// Creates a draft slip for every listed employee that has none yet.
    ///
    /// Each employee is written in its own transaction; failures are
    /// collected on the entry, which then lands in Failed.
    #[instrument(skip(self))]
    pub async fn create_salary_slips(
        &self,
        id: Uuid,
    ) -> Result<payroll_entry::Model, ServiceError> {
        let db = &*self.db;
        let entry = find_entry(db, id).await?;
        ensure_running(&entry)?;

        let existing: HashSet<String> = salary_slip::Entity::find()
            .filter(salary_slip::Column::PayrollEntry.eq(id))
            .filter(salary_slip::Column::Docstatus.ne(DocStatus::Cancelled))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.employee)
            .collect();

        let mut outcome = BatchOutcome::default();
        for row in employee_rows(db, id).await? {
            if existing.contains(&row.employee) {
                continue;
            }
            match self.create_slip(&entry, &row).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    warn!(employee = %row.employee, "Salary slip not created: {}", e);
                    outcome.record_failure(row.employee.clone(), failure_reason(&e));
                }
            }
        }

        let status = entry.status.transition(outcome.resulting_status())?;
        let mut active: payroll_entry::ActiveModel = entry.into();
        active.status = Set(status);
        active.error_message = Set(outcome.error_message());
        active.salary_slips_created = Set(outcome.is_success());
        let entry = active.update(db).await?;

        self.report_outcome(id, &outcome, |count| Event::SalarySlipsCreated {
            payroll_entry_id: id,
            count,
        })
        .await;

        Ok(entry)
    }

    async fn create_slip(
        &self,
        entry: &payroll_entry::Model,
        row: &payroll_employee_detail::Model,
    ) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let employee = employee::Entity::find_by_id(row.employee.clone())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Employee", &row.employee))?;
        if !employee.is_payable(entry.start_date, entry.end_date) {
            return Err(ServiceError::ValidationError(format!(
                "Employee {} is not active in the payroll period",
                employee.name
            )));
        }

        let assignment = salary_structure_assignment::Entity::find()
            .filter(salary_structure_assignment::Column::Employee.eq(employee.name.clone()))
            .filter(salary_structure_assignment::Column::Company.eq(entry.company.clone()))
            .filter(salary_structure_assignment::Column::Docstatus.eq(DocStatus::Submitted))
            .filter(salary_structure_assignment::Column::FromDate.lte(entry.end_date))
            .order_by_desc(salary_structure_assignment::Column::FromDate)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "No salary structure assigned to {} on {}",
                    employee.name, entry.end_date
                ))
            })?;

        let structure_rows = salary_structure_component::Entity::find()
            .filter(
                salary_structure_component::Column::SalaryStructure
                    .eq(assignment.salary_structure.clone()),
            )
            .order_by_asc(salary_structure_component::Column::Idx)
            .all(&txn)
            .await?;

        let mut components = Vec::with_capacity(structure_rows.len());
        for line in &structure_rows {
            let component = salary_component::Entity::find_by_id(line.salary_component.clone())
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "Unknown salary component {}",
                        line.salary_component
                    ))
                })?;
            components.push(ComponentAmount {
                salary_component: component.name,
                component_type: component.component_type,
                amount: line.amount,
            });
        }

        let totals = compute_totals(&components, entry.exchange_rate);
        let slip = salary_slip::ActiveModel {
            payroll_entry: Set(Some(entry.id)),
            employee: Set(employee.name.clone()),
            employee_name: Set(employee.employee_name.clone()),
            company: Set(entry.company.clone()),
            posting_date: Set(entry.posting_date),
            start_date: Set(entry.start_date),
            end_date: Set(entry.end_date),
            salary_structure: Set(assignment.salary_structure.clone()),
            currency: Set(entry.currency.clone()),
            exchange_rate: Set(entry.exchange_rate),
            payroll_payable_account: Set(assignment
                .payroll_payable_account
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| entry.payroll_payable_account.clone())),
            gross_pay: Set(totals.gross_pay),
            total_deduction: Set(totals.total_deduction),
            net_pay: Set(totals.net_pay),
            base_gross_pay: Set(totals.base_gross_pay),
            base_total_deduction: Set(totals.base_total_deduction),
            base_net_pay: Set(totals.base_net_pay),
            docstatus: Set(DocStatus::Draft),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (position, component) in components.iter().enumerate() {
            salary_slip_detail::ActiveModel {
                id: Set(Uuid::new_v4()),
                salary_slip: Set(slip.id),
                idx: Set(position as i32 + 1),
                salary_component: Set(component.salary_component.clone()),
                component_type: Set(component.component_type),
                amount: Set(component.amount),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Submits the entry's draft salary slips, now or on the worker.
    #[instrument(skip(self))]
    pub async fn submit_salary_slips(
        &self,
        id: Uuid,
        options: PayrollRunOptions,
    ) -> Result<payroll_entry::Model, ServiceError> {
        let db = &*self.db;
        let entry = find_entry(db, id).await?;
        ensure_running(&entry)?;

        let drafts = draft_slips(db, id).await?;
        if drafts.is_empty() {
            return Err(ServiceError::InvalidOperation(format!(
                "Payroll Entry {} has no draft salary slips to submit",
                id
            )));
        }

        if options.should_defer(drafts.len()) {
            self.require_queue()?;
            let status = entry.status.transition(PayrollStatus::Queued)?;
            let mut active: payroll_entry::ActiveModel = entry.into();
            active.status = Set(status);
            let entry = active.update(db).await?;

            let entry = self
                .enqueue_or_fail(
                    entry,
                    Job::SubmitSalarySlips {
                        payroll_entry_id: id,
                        make_payment_entry: options.make_payment_entry,
                    },
                )
                .await?;
            info!(payroll_entry_id = %id, slips = drafts.len(), "Salary slip submission queued");
            self.emit(Event::PayrollEntryQueued(id)).await;
            return Ok(entry);
        }

        self.submit_draft_slips(id, options.make_payment_entry).await
    }

    async fn submit_draft_slips(
        &self,
        id: Uuid,
        make_payment_entry: bool,
    ) -> Result<payroll_entry::Model, ServiceError> {
        let db = &*self.db;
        let entry = find_entry(db, id).await?;
        ensure_running(&entry)?;

        let accounted: HashSet<String> = salary_component_account::Entity::find()
            .filter(salary_component_account::Column::Company.eq(entry.company.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.salary_component)
            .collect();

        let mut outcome = BatchOutcome::default();
        for slip in draft_slips(db, id).await? {
            let employee = slip.employee.clone();
            match submit_slip(db, slip, &accounted).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    warn!(employee = %employee, "Salary slip not submitted: {}", e);
                    outcome.record_failure(employee, failure_reason(&e));
                }
            }
        }

        let status = entry.status.transition(outcome.resulting_status())?;
        let mut active: payroll_entry::ActiveModel = entry.into();
        active.status = Set(status);
        active.error_message = Set(outcome.error_message());
        active.salary_slips_submitted = Set(outcome.is_success());
        let mut entry = active.update(db).await?;

        self.report_outcome(id, &outcome, |count| Event::SalarySlipsSubmitted {
            payroll_entry_id: id,
            count,
        })
        .await;

        if outcome.is_success() && make_payment_entry {
            self.make_payment_entry(id).await?;
            entry = find_entry(db, id).await?;
        }

        Ok(entry)
    }

    /// Books one payment per (payable account, currency) for the submitted slips.
    #[instrument(skip(self))]
    pub async fn make_payment_entry(
        &self,
        id: Uuid,
    ) -> Result<Vec<payroll_payment_entry::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, id).await?;
        if !entry.salary_slips_submitted {
            return Err(ServiceError::InvalidOperation(format!(
                "Salary slips of Payroll Entry {} are not all submitted",
                id
            )));
        }

        let existing = payroll_payment_entry::Entity::find()
            .filter(payroll_payment_entry::Column::PayrollEntry.eq(id))
            .filter(payroll_payment_entry::Column::Docstatus.ne(DocStatus::Cancelled))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Payment entries already exist for Payroll Entry {}",
                id
            )));
        }

        let slips = salary_slip::Entity::find()
            .filter(salary_slip::Column::PayrollEntry.eq(id))
            .filter(salary_slip::Column::Docstatus.eq(DocStatus::Submitted))
            .all(&txn)
            .await?;
        let payables: Vec<_> = slips.iter().map(|s| s.payable()).collect();

        let mut created = Vec::new();
        for payment in consolidate_payments(&payables) {
            let saved = payroll_payment_entry::ActiveModel {
                payroll_entry: Set(id),
                company: Set(entry.company.clone()),
                posting_date: Set(entry.posting_date),
                payable_account: Set(payment.payable_account),
                payment_account: Set(entry.payment_account.clone()),
                currency: Set(payment.currency),
                amount: Set(payment.amount),
                base_amount: Set(payment.base_amount),
                slip_count: Set(payment.slip_count as i32),
                docstatus: Set(DocStatus::Submitted),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(saved);
        }
        txn.commit().await?;

        counter!("payroll_entry.payment_entries_created", created.len() as u64);
        self.emit(Event::PayrollPaymentRecorded {
            payroll_entry_id: id,
            entries: created.len(),
        })
        .await;

        Ok(created)
    }

    /// Cancels a submitted entry. Draft slips are removed, submitted slips
    /// cancelled.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<payroll_entry::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, id).await?;
        if entry.status == PayrollStatus::Queued {
            return Err(ServiceError::InvalidStatus(format!(
                "Payroll Entry {} is queued for processing and cannot be cancelled",
                id
            )));
        }
        if !entry.docstatus.is_submitted() {
            return Err(ServiceError::InvalidStatus(format!(
                "Only submitted payroll entries can be cancelled, {} is not",
                id
            )));
        }

        let payments = payroll_payment_entry::Entity::find()
            .filter(payroll_payment_entry::Column::PayrollEntry.eq(id))
            .filter(payroll_payment_entry::Column::Docstatus.ne(DocStatus::Cancelled))
            .count(&txn)
            .await?;
        if payments > 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Cancel the payment entries of Payroll Entry {} first",
                id
            )));
        }

        let status = entry.status.transition(PayrollStatus::Cancelled)?;

        for slip in salary_slip::Entity::find()
            .filter(salary_slip::Column::PayrollEntry.eq(id))
            .all(&txn)
            .await?
        {
            match slip.docstatus {
                DocStatus::Draft => {
                    salary_slip_detail::Entity::delete_many()
                        .filter(salary_slip_detail::Column::SalarySlip.eq(slip.id))
                        .exec(&txn)
                        .await?;
                    salary_slip::Entity::delete_by_id(slip.id).exec(&txn).await?;
                }
                DocStatus::Submitted => {
                    let mut active: salary_slip::ActiveModel = slip.into();
                    active.docstatus = Set(DocStatus::Cancelled);
                    active.update(&txn).await?;
                }
                DocStatus::Cancelled => {}
            }
        }

        let mut active: payroll_entry::ActiveModel = entry.into();
        active.status = Set(status);
        active.docstatus = Set(DocStatus::Cancelled);
        let entry = active.update(&txn).await?;
        txn.commit().await?;

        counter!("payroll_entry.cancelled", 1);
        info!(payroll_entry_id = %id, "Payroll entry cancelled");
        self.emit(Event::PayrollEntryCancelled(id)).await;

        Ok(entry)
    }

    /// Runs a deferred payroll job with the options it was queued with.
    pub async fn process_job(&self, job: &Job) -> Result<(), ServiceError> {
        match job {
            Job::CreateSalarySlips { payroll_entry_id } => {
                self.create_salary_slips(*payroll_entry_id).await?;
            }
            Job::SubmitSalarySlips {
                payroll_entry_id,
                make_payment_entry,
            } => {
                self.submit_draft_slips(*payroll_entry_id, *make_payment_entry)
                    .await?;
            }
            Job::RepostItemValuation => {
                return Err(ServiceError::InternalError(
                    "Reposting jobs are not handled by payroll".to_string(),
                ))
            }
        }
        Ok(())
    }

    fn require_queue(&self) -> Result<&Arc<dyn JobQueue>, ServiceError> {
        self.job_queue
            .as_ref()
            .ok_or_else(|| ServiceError::QueueError("No job queue configured".to_string()))
    }

    async fn enqueue(&self, job: Job) -> Result<(), ServiceError> {
        let queue = self.require_queue()?;
        queue.enqueue(job).await.map_err(|e| {
            error!("Failed to queue payroll job: {}", e);
            ServiceError::from(e)
        })?;
        Ok(())
    }

    /// Queues `job`, or moves the entry to Failed with the queue error so it
    /// can be retried or cancelled.
    async fn enqueue_or_fail(
        &self,
        entry: payroll_entry::Model,
        job: Job,
    ) -> Result<payroll_entry::Model, ServiceError> {
        match self.enqueue(job).await {
            Ok(()) => Ok(entry),
            Err(err) => {
                let mut failed: payroll_entry::ActiveModel = entry.into();
                failed.status = Set(PayrollStatus::Failed);
                failed.error_message = Set(Some(err.to_string()));
                failed.update(&*self.db).await?;
                Err(err)
            }
        }
    }

    async fn report_outcome(
        &self,
        id: Uuid,
        outcome: &BatchOutcome,
        on_success: impl FnOnce(usize) -> Event,
    ) {
        if outcome.is_success() {
            info!(payroll_entry_id = %id, succeeded = outcome.succeeded, "Payroll batch finished");
            self.emit(on_success(outcome.succeeded)).await;
        } else {
            counter!("payroll_entry.failed", 1);
            error!(
                payroll_entry_id = %id,
                succeeded = outcome.succeeded,
                failed = outcome.failures.len(),
                "Payroll batch finished with failures"
            );
            self.emit(Event::PayrollEntryFailed {
                payroll_entry_id: id,
                failed_employees: outcome.failures.len(),
            })
            .await;
        }
    }
}

/// Batch operations run only on submitted entries that are not cancelled.
fn ensure_running(entry: &payroll_entry::Model) -> Result<(), ServiceError> {
    if entry.docstatus.is_submitted() {
        Ok(())
    } else {
        Err(ServiceError::InvalidStatus(format!(
            "Payroll Entry {} must be submitted",
            entry.id
        )))
    }
}

fn failure_reason(err: &ServiceError) -> String {
    match err {
        ServiceError::ValidationError(msg)
        | ServiceError::NotFound(msg)
        | ServiceError::InvalidOperation(msg) => msg.clone(),
        other => other.to_string(),
    }
}

async fn submit_slip<C: ConnectionTrait>(
    conn: &C,
    slip: salary_slip::Model,
    accounted: &HashSet<String>,
) -> Result<(), ServiceError> {
    let details = salary_slip_detail::Entity::find()
        .filter(salary_slip_detail::Column::SalarySlip.eq(slip.id))
        .all(conn)
        .await?;
    let missing = missing_component_accounts(
        details.iter().map(|d| d.salary_component.as_str()),
        accounted,
    );
    if !missing.is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "No account set for salary component(s) {} in company {}",
            missing.join(", "),
            slip.company
        )));
    }

    let mut active: salary_slip::ActiveModel = slip.into();
    active.docstatus = Set(DocStatus::Submitted);
    active.update(conn).await?;
    Ok(())
}

async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<payroll_entry::Model, ServiceError> {
    payroll_entry::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Payroll Entry", id))
}

async fn employee_rows<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Vec<payroll_employee_detail::Model>, ServiceError> {
    Ok(payroll_employee_detail::Entity::find()
        .filter(payroll_employee_detail::Column::PayrollEntry.eq(id))
        .order_by_asc(payroll_employee_detail::Column::Idx)
        .all(conn)
        .await?)
}

async fn draft_slips<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Vec<salary_slip::Model>, ServiceError> {
    Ok(salary_slip::Entity::find()
        .filter(salary_slip::Column::PayrollEntry.eq(id))
        .filter(salary_slip::Column::Docstatus.eq(DocStatus::Draft))
        .order_by_asc(salary_slip::Column::Employee)
        .all(conn)
        .await?)
}
