use anyhow::Result;

use anchorage_core::model::{Deployment, IndexEndpoint, VectorIndex};
use anchorage_provision::{Ensured, Outcome, ProvisionPlan};

use super::Context;

fn index_line(index: &Ensured<VectorIndex>) -> String {
    match index.outcome {
        Outcome::Created => format!(
            "✓ Vector Search index {} created with resource name {}",
            index.resource.display_name, index.resource.name
        ),
        Outcome::Reused => format!(
            "✓ Vector Search index {} exists with resource name {}",
            index.resource.display_name, index.resource.name
        ),
    }
}

fn endpoint_line(endpoint: &Ensured<IndexEndpoint>) -> String {
    match endpoint.outcome {
        Outcome::Created => format!(
            "✓ Vector Search index endpoint {} created with resource name {}",
            endpoint.resource.display_name, endpoint.resource.name
        ),
        Outcome::Reused => format!(
            "✓ Vector Search index endpoint {} exists with resource name {}",
            endpoint.resource.display_name, endpoint.resource.name
        ),
    }
}

fn deployment_line(index_name: &str, deployment: &Ensured<Deployment>) -> String {
    let verb = match deployment.outcome {
        Outcome::Created => "is deployed",
        Outcome::Reused => "is already deployed",
    };
    format!(
        "✓ Index {} {} at endpoint {} as {}",
        index_name,
        verb,
        deployment.resource.endpoint.display_name,
        deployment.resource.deployed_index_id
    )
}

pub async fn run_index(ctx: &Context, name: &str, dimensions: u32) -> Result<()> {
    let index = ctx
        .provisioner()
        .indexes()
        .ensure_index(name, dimensions)
        .await?;
    println!("{}", index_line(&index));
    Ok(())
}

pub async fn run_endpoint(ctx: &Context, name: &str) -> Result<()> {
    let endpoint = ctx.provisioner().endpoints().ensure_endpoint(name).await?;
    println!("{}", endpoint_line(&endpoint));
    Ok(())
}

pub async fn run_deploy(
    ctx: &Context,
    index: &str,
    endpoint: &str,
    deployment_id: Option<&str>,
) -> Result<()> {
    let deployment = ctx
        .provisioner()
        .deploy_existing(index, endpoint, deployment_id.unwrap_or(index))
        .await?;
    println!("{}", deployment_line(index, &deployment));
    Ok(())
}

pub async fn run_up(ctx: &Context, plan: &ProvisionPlan) -> Result<()> {
    log::info!(
        "Provisioning {} ({} dimensions) on {}",
        plan.index_name,
        plan.dimensions,
        plan.endpoint_name
    );

    let provisioned = ctx.provisioner().provision(plan).await?;

    println!("{}", index_line(&provisioned.index));
    println!("{}", endpoint_line(&provisioned.endpoint));
    println!(
        "{}",
        deployment_line(&plan.index_name, &provisioned.deployment)
    );

    if let Some(domain) = &provisioned.endpoint.resource.public_endpoint_domain_name {
        println!("\n  Query host: {domain}");
    }

    Ok(())
}
