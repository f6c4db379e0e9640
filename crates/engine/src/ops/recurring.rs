//! The due-obligation processor.
//!
//! An external trigger (cron, orchestrator) calls
//! [`Engine::process_due_fixed_expenses`] on a cadence; the engine never
//! schedules itself. Each due obligation is handled in its own transaction,
//! so one bad row never aborts the batch: it is logged, skipped, and picked
//! up again on the next trigger because its `next_due_date` did not advance.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, EntityStatus, Expense, FixedExpense, RecurrenceKind, ResultEngine, bank_accounts,
    expenses, fixed_expenses, recurrence,
};

use super::{Engine, normalize_required_name, with_tx};

/// Outcome of one batch run.
///
/// `examined` is the observability headline: how many due rows the query
/// returned. It is not a correctness signal; per-item outcomes surface in the
/// logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub examined: usize,
    pub processed: usize,
    pub skipped: usize,
}

impl Engine {
    /// Create a recurring obligation.
    pub async fn new_fixed_expense(
        &self,
        user_id: &str,
        bank_account_id: Uuid,
        category_id: Option<Uuid>,
        name: &str,
        amount_minor: i64,
        due_date: NaiveDate,
        recurrence: RecurrenceKind,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "fixed expense")?;
        let fixed = FixedExpense::new(
            user_id.to_string(),
            bank_account_id,
            category_id,
            name,
            amount_minor,
            due_date,
            recurrence,
        )?;

        with_tx!(self, |db_tx| {
            self.require_active_account(&db_tx, bank_account_id, user_id)
                .await?;
            if let Some(category_id) = category_id {
                self.require_category(&db_tx, category_id, user_id).await?;
            }

            let fixed_id = fixed.id;
            fixed_expenses::ActiveModel::from(&fixed).insert(&db_tx).await?;
            Ok(fixed_id)
        })
    }

    /// Return a fixed expense snapshot.
    pub async fn fixed_expense(
        &self,
        user_id: &str,
        fixed_expense_id: Uuid,
    ) -> ResultEngine<FixedExpense> {
        with_tx!(self, |db_tx| {
            let model = fixed_expenses::Entity::find_by_id(fixed_expense_id.to_string())
                .filter(fixed_expenses::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("fixed expense not exists".to_string()))?;
            FixedExpense::try_from(model)
        })
    }

    /// The occurrence date of an obligation in a given month, if any.
    ///
    /// Pure schedule preview: answers "does this apply in `(year, month)`
    /// and on which day", without touching balances or the schedule.
    pub async fn occurrence_in_month(
        &self,
        user_id: &str,
        fixed_expense_id: Uuid,
        year: i32,
        month: u32,
    ) -> ResultEngine<Option<NaiveDate>> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate(format!("invalid month: {month}")));
        }
        let fixed = self.fixed_expense(user_id, fixed_expense_id).await?;
        if !recurrence::applies_in_month(
            fixed.status,
            fixed.is_recurring,
            fixed.recurrence,
            fixed.due_date,
            month,
        ) {
            return Ok(None);
        }
        Ok(Some(recurrence::due_day_in_month(
            fixed.due_date.day(),
            year,
            month,
        )))
    }

    /// Move an obligation to a new lifecycle status.
    ///
    /// Obligations are never physically removed mid-schedule; retiring one is
    /// a status change.
    pub async fn set_fixed_expense_status(
        &self,
        user_id: &str,
        fixed_expense_id: Uuid,
        status: EntityStatus,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            fixed_expenses::Entity::find_by_id(fixed_expense_id.to_string())
                .filter(fixed_expenses::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("fixed expense not exists".to_string()))?;

            let active = fixed_expenses::ActiveModel {
                id: ActiveValue::Set(fixed_expense_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Process every obligation due as of `now`.
    ///
    /// Safe to call repeatedly: obligations not yet due are excluded by the
    /// query, and a successful run advances `next_due_date` past `now`, so an
    /// immediate second run finds nothing to do.
    pub async fn process_due_fixed_expenses(
        &self,
        now: DateTime<Utc>,
    ) -> ResultEngine<ProcessReport> {
        let today = now.date_naive();

        let due: Vec<(fixed_expenses::Model, Option<bank_accounts::Model>)> =
            fixed_expenses::Entity::find()
                .filter(fixed_expenses::Column::NextDueDate.lte(today))
                .filter(fixed_expenses::Column::Status.eq(EntityStatus::Active.as_str()))
                .filter(fixed_expenses::Column::IsRecurring.eq(true))
                .find_also_related(bank_accounts::Entity)
                .all(&self.database)
                .await?;

        let mut report = ProcessReport {
            examined: due.len(),
            ..Default::default()
        };

        for (model, _account) in due {
            let fixed_id = model.id.clone();
            let outcome = match FixedExpense::try_from(model) {
                Ok(fixed) => self.process_fixed_expense(&fixed, now).await,
                Err(err) => Err(err),
            };
            match outcome {
                Ok(()) => report.processed += 1,
                Err(err) => {
                    tracing::warn!(
                        fixed_expense_id = %fixed_id,
                        "skipping fixed expense: {err}"
                    );
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            examined = report.examined,
            processed = report.processed,
            skipped = report.skipped,
            "processed due fixed expenses"
        );
        Ok(report)
    }

    /// One atomic unit of work: materialize a single due occurrence.
    ///
    /// Everything commits together or rolls back together: the schedule
    /// advance, the expense row, and the balance debit.
    async fn process_fixed_expense(
        &self,
        fixed: &FixedExpense,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let next_due = recurrence::next_occurrence(
            fixed.recurrence,
            fixed.due_date,
            fixed.next_due_date,
        );

        with_tx!(self, |db_tx| {
            // Conditional schedule advance: only proceeds when nobody else
            // advanced this row since we read it. Losing the race means a
            // concurrent trigger already materialized this occurrence.
            let advanced = fixed_expenses::Entity::update_many()
                .col_expr(fixed_expenses::Column::NextDueDate, Expr::value(next_due))
                .col_expr(
                    fixed_expenses::Column::LastProcessedAt,
                    Expr::value(Some(now)),
                )
                .filter(fixed_expenses::Column::Id.eq(fixed.id.to_string()))
                .filter(fixed_expenses::Column::NextDueDate.eq(fixed.next_due_date))
                .exec(&db_tx)
                .await?;
            if advanced.rows_affected == 0 {
                return Err(EngineError::StaleSchedule(format!(
                    "fixed expense {} was already processed for {}",
                    fixed.id, fixed.next_due_date
                )));
            }

            let account_model = self
                .require_active_account(&db_tx, fixed.bank_account_id, &fixed.user_id)
                .await?;

            let category_id = fixed.category_id.ok_or_else(|| {
                EngineError::KeyNotFound(format!(
                    "fixed expense {} has no category",
                    fixed.id
                ))
            })?;
            self.require_category(&db_tx, category_id, &fixed.user_id)
                .await?;

            // Soft constraint: the debit may take the account negative. This
            // is deliberately different from transfers, which hard-reject.
            if account_model.balance_minor < fixed.amount_minor {
                tracing::warn!(
                    fixed_expense_id = %fixed.id,
                    bank_account_id = %fixed.bank_account_id,
                    balance_minor = account_model.balance_minor,
                    amount_minor = fixed.amount_minor,
                    "insufficient balance, debiting account into negative"
                );
            }

            let expense = Expense::new(
                fixed.user_id.clone(),
                fixed.bank_account_id,
                category_id,
                fixed.name.clone(),
                fixed.amount_minor,
                now.date_naive(),
                Some(fixed.id),
            );
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            self.adjust_balance(&db_tx, fixed.bank_account_id, -fixed.amount_minor)
                .await?;

            Ok(())
        })
    }
}
