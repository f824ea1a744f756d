//! Fund aggregate operations.

use abp_core::{
    Action, CashflowTotals, Error, Fund, FundCashflow, FundEvent, FundId, FundReport, Investor,
    InvestorCashflow, InvestorCashflowId, InvestorId, ResourceKind, apply_fund_event,
    finish_investor_cashflow, sign_investor,
};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store, Txn};

/// Create a fund.
///
/// # Errors
/// Forbidden without `funds_write`.
pub fn create_fund(store: &Store, ctx: Ctx, fund: Fund) -> Result<Committed<Fund>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::fund_target(&fund))?;
        fund.validate().into_result()?;
        txn.db_mut().funds.insert(fund.id, fund.clone());
        txn.version_created(&fund, Some(ctx.actor));
        Ok(fund.clone())
    })
}

/// Fire a fund lifecycle event.
///
/// # Errors
/// Forbidden without `funds_write`; illegal transitions fail validation.
pub fn transition_fund(
    store: &Store,
    ctx: Ctx,
    id: FundId,
    event: FundEvent,
) -> Result<Committed<Fund>, Error> {
    store.mutate(|txn| {
        let before = txn.db().fund(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::fund_target(&before))?;

        let mut after = before.clone();
        apply_fund_event(&mut after, event)?;

        txn.db_mut().funds.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Create an investor in `created` state.
///
/// # Errors
/// Forbidden without `funds_write`; unknown fund or mandate aborts.
pub fn create_investor(
    store: &Store,
    ctx: Ctx,
    investor: Investor,
) -> Result<Committed<Investor>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::investor_target(&investor))?;
        txn.db().fund(investor.fund_id)?;
        txn.db().mandate(investor.mandate_id)?;
        investor.validate().into_result()?;

        txn.db_mut().investors.insert(investor.id, investor.clone());
        txn.version_created(&investor, Some(ctx.actor));
        Ok(investor.clone())
    })
}

/// Sign an investor. Defaults the investment date to the transaction date
/// and enforces the signed-state post-conditions.
///
/// # Errors
/// Forbidden without `funds_write`; a missing subscription agreement fails
/// validation and leaves the investor untouched.
pub fn sign_investor_op(
    store: &Store,
    ctx: Ctx,
    id: InvestorId,
) -> Result<Committed<Investor>, Error> {
    store.mutate(|txn| {
        let before = txn.db().investor(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::investor_target(&before))?;

        let mut after = before.clone();
        sign_investor(&mut after, txn.now().date_naive())?;
        if let Some(document_id) = after.fund_subscription_agreement {
            txn.db().document(document_id)?;
        }

        txn.db_mut().investors.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Create a fund cashflow batch with its investor line items, all or
/// nothing: any unsigned or foreign-fund investor rejects the entire batch.
///
/// # Errors
/// Forbidden without `funds_write`; line-item validation failures abort the
/// whole commit, persisting neither the batch nor any line item.
pub fn create_fund_cashflow(
    store: &Store,
    ctx: Ctx,
    batch: FundCashflow,
    line_items: Vec<InvestorCashflow>,
) -> Result<Committed<FundCashflow>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::fund_cashflow_target(&batch))?;
        let fund = txn.db().fund(batch.fund_id)?.clone();

        txn.db_mut().fund_cashflows.insert(batch.id, batch.clone());
        txn.version_created(&batch, Some(ctx.actor));

        for mut item in line_items {
            item.fund_cashflow_id = batch.id;
            let investor = txn.db().investor(item.investor_id)?.clone();
            item.validate(&investor, &batch).into_result()?;

            txn.db_mut().investor_cashflows.insert(item.id, item.clone());
            push_line_item_version(txn, ctx, &item, fund.id);
        }

        Ok(batch.clone())
    })
}

/// Finish an open investor cashflow line item.
///
/// # Errors
/// Forbidden without `funds_write`; finishing twice fails validation.
pub fn finish_investor_cashflow_op(
    store: &Store,
    ctx: Ctx,
    id: InvestorCashflowId,
) -> Result<Committed<InvestorCashflow>, Error> {
    store.mutate(|txn| {
        let before = txn.db().investor_cashflow(id)?.clone();
        authorize(
            txn.db(),
            ctx,
            Action::Write,
            &scope::investor_cashflow_target(&before),
        )?;

        let mut after = before.clone();
        finish_investor_cashflow(&mut after.state)?;

        let fund_id = txn.db().fund_cashflow(after.fund_cashflow_id)?.fund_id;
        txn.db_mut().investor_cashflows.insert(id, after.clone());
        if let Some(version) = txn.build_updated(&before, &after, Some(ctx.actor)) {
            txn.push_version(version.with_parent(ResourceKind::Fund, fund_id.to_string()));
        }

        let totals = CashflowTotals::of(txn.db().line_items_of(after.fund_cashflow_id));
        tracing::debug!(
            batch = %after.fund_cashflow_id,
            ?totals,
            "recomputed batch totals"
        );
        Ok(after)
    })
}

/// Publish a fund report.
///
/// # Errors
/// Forbidden without `funds_write`.
pub fn create_fund_report(
    store: &Store,
    ctx: Ctx,
    report: FundReport,
) -> Result<Committed<FundReport>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::fund_report_target(&report))?;
        txn.db().fund(report.fund_id)?;
        report.validate().into_result()?;

        txn.db_mut().fund_reports.insert(report.id, report.clone());
        txn.version_created(&report, Some(ctx.actor));
        Ok(report.clone())
    })
}

/// The line item's timeline parent is the fund, resolved through the batch.
fn push_line_item_version(txn: &mut Txn<'_>, ctx: Ctx, item: &InvestorCashflow, fund: FundId) {
    let version = txn
        .build_created(item, Some(ctx.actor))
        .with_parent(ResourceKind::Fund, fund.to_string());
    txn.push_version(version);
}
