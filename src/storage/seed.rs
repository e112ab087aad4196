//! Demo dataset — the seed records the back office starts from in demos
//! and local development. Invoked via `advisord seed`; inserting twice
//! produces duplicate records, so it is meant for a fresh data dir.

use anyhow::Result;
use tracing::info;

use super::Storage;
use crate::domain::{
    Availability, BudgetDraft, ClientDraft, ClientStatus, ConsultantDraft, ExpenseCategory,
    ExpenseDraft, InvoiceDraft, InvoiceStatus, ProjectDraft, ProjectStatus, Seniority,
    TaxRateDraft,
};

/// Insert the demo dataset. Returns the number of records created.
pub async fn seed_demo_data(storage: &Storage) -> Result<usize> {
    let mut count = 0;

    // Tax rates first — invoices reference them by id.
    let vat_de = storage
        .create_tax_rate(&TaxRateDraft {
            name: "VAT (DE)".into(),
            country: "Germany".into(),
            rate_percent: 19.0,
            active: Some(true),
        })
        .await?;
    let vat_uk = storage
        .create_tax_rate(&TaxRateDraft {
            name: "VAT (UK)".into(),
            country: "United Kingdom".into(),
            rate_percent: 20.0,
            active: Some(true),
        })
        .await?;
    count += 2;

    let meridian = storage
        .create_client(&ClientDraft {
            name: "Meridian Retail Group".into(),
            industry: "Retail".into(),
            contact_name: "Dana Whitfield".into(),
            contact_email: "dana.whitfield@meridian.example".into(),
            country: "Germany".into(),
            status: Some(ClientStatus::Active),
        })
        .await?;
    let harbrook = storage
        .create_client(&ClientDraft {
            name: "Harbrook Logistics".into(),
            industry: "Logistics".into(),
            contact_name: "Tomas Eriksen".into(),
            contact_email: "t.eriksen@harbrook.example".into(),
            country: "United Kingdom".into(),
            status: Some(ClientStatus::Active),
        })
        .await?;
    storage
        .create_client(&ClientDraft {
            name: "Aurelia Health Partners".into(),
            industry: "Healthcare".into(),
            contact_name: "Ines Valbuena".into(),
            contact_email: "ines@aurelia.example".into(),
            country: "Spain".into(),
            status: Some(ClientStatus::Prospect),
        })
        .await?;
    count += 3;

    for (name, email, specialty, seniority, rate, availability) in [
        (
            "Priya Raman",
            "priya.raman@advisord.example",
            "Data Engineering",
            Seniority::Senior,
            1450.0,
            Availability::Assigned,
        ),
        (
            "Jonas Keller",
            "jonas.keller@advisord.example",
            "Supply Chain",
            Seniority::Principal,
            1900.0,
            Availability::Assigned,
        ),
        (
            "Mei-Ling Chou",
            "meiling.chou@advisord.example",
            "Change Management",
            Seniority::Mid,
            980.0,
            Availability::Available,
        ),
        (
            "Sofia Andrade",
            "sofia.andrade@advisord.example",
            "Cloud Migration",
            Seniority::Junior,
            620.0,
            Availability::OnLeave,
        ),
    ] {
        storage
            .create_consultant(&ConsultantDraft {
                name: name.into(),
                email: email.into(),
                specialty: specialty.into(),
                seniority,
                daily_rate_usd: rate,
                availability: Some(availability),
            })
            .await?;
        count += 1;
    }

    let rollout = storage
        .create_project(
            &ProjectDraft {
                name: "Warehouse Automation Rollout".into(),
                client_id: meridian.id.clone(),
                status: Some(ProjectStatus::Active),
                start_date: "2026-03-02".into(),
                end_date: Some("2026-11-30".into()),
                budget_usd: 420_000.0,
            },
            &meridian.name,
        )
        .await?;
    let fleet = storage
        .create_project(
            &ProjectDraft {
                name: "Fleet Telemetry Platform".into(),
                client_id: harbrook.id.clone(),
                status: Some(ProjectStatus::Active),
                start_date: "2026-05-18".into(),
                end_date: None,
                budget_usd: 260_000.0,
            },
            &harbrook.name,
        )
        .await?;
    count += 2;

    for (project, category, description, amount, incurred_on, billable) in [
        (&rollout, ExpenseCategory::Travel, "Site visits, Hamburg DC", 6_420.0, "2026-04-11", true),
        (&rollout, ExpenseCategory::Software, "Simulation tooling licences", 11_800.0, "2026-04-28", true),
        (&rollout, ExpenseCategory::Subcontracting, "PLC integration partner", 38_500.0, "2026-06-15", true),
        (&fleet, ExpenseCategory::Travel, "Kickoff week, Leeds", 3_140.0, "2026-05-22", true),
        (&fleet, ExpenseCategory::Office, "Project room fit-out", 1_250.0, "2026-06-01", false),
    ] {
        storage
            .create_expense(
                &ExpenseDraft {
                    project_id: project.id.clone(),
                    category,
                    description: description.into(),
                    amount_usd: amount,
                    incurred_on: incurred_on.into(),
                    billable: Some(billable),
                },
                &project.name,
            )
            .await?;
        count += 1;
    }

    for (project, category, allocated, period) in [
        (&rollout, ExpenseCategory::Travel, 18_000.0, "2026-Q2"),
        (&rollout, ExpenseCategory::Subcontracting, 90_000.0, "2026-Q2"),
        (&fleet, ExpenseCategory::Travel, 8_000.0, "2026-Q2"),
    ] {
        storage
            .create_budget(
                &BudgetDraft {
                    project_id: project.id.clone(),
                    category,
                    allocated_usd: allocated,
                    period: period.into(),
                },
                &project.name,
            )
            .await?;
        count += 1;
    }

    storage
        .create_invoice(
            &InvoiceDraft {
                number: "INV-2026-0014".into(),
                project_id: rollout.id.clone(),
                amount_usd: 84_000.0,
                tax_rate_id: Some(vat_de.id.clone()),
                status: Some(InvoiceStatus::Paid),
                issued_on: "2026-05-01".into(),
                due_on: "2026-05-31".into(),
                paid_on: Some("2026-05-27".into()),
            },
            &rollout.name,
            &meridian.name,
            vat_de.rate_percent,
        )
        .await?;
    storage
        .create_invoice(
            &InvoiceDraft {
                number: "INV-2026-0021".into(),
                project_id: rollout.id.clone(),
                amount_usd: 96_000.0,
                tax_rate_id: Some(vat_de.id.clone()),
                status: Some(InvoiceStatus::Sent),
                issued_on: "2026-07-01".into(),
                due_on: "2026-07-31".into(),
                paid_on: None,
            },
            &rollout.name,
            &meridian.name,
            vat_de.rate_percent,
        )
        .await?;
    storage
        .create_invoice(
            &InvoiceDraft {
                number: "INV-2026-0019".into(),
                project_id: fleet.id.clone(),
                amount_usd: 52_000.0,
                tax_rate_id: Some(vat_uk.id.clone()),
                status: Some(InvoiceStatus::Overdue),
                issued_on: "2026-06-05".into(),
                due_on: "2026-07-05".into(),
                paid_on: None,
            },
            &fleet.name,
            &harbrook.name,
            vat_uk.rate_percent,
        )
        .await?;
    count += 3;

    info!(records = count, "demo dataset seeded");
    Ok(count)
}
