use domain_webhook::{model::entity::ArgoWorkflow, repository::ArgoWorkflowRepo};
use hub_architecture::repository::{DBRepository, MutableRepository, ReadOnlyRepository};
use redis::Cmd;

use crate::infrastructure::database::RedisRepo;

fn workflow_key(id: i64) -> String {
    format!("argo_workflow:{id}")
}

fn workflow_task_key(task_id: &str) -> String {
    format!("argo_workflow:task:{task_id}")
}

#[async_trait::async_trait]
impl ReadOnlyRepository<ArgoWorkflow> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<ArgoWorkflow>> {
        self.connection()?.get_json(&workflow_key(id))
    }
}

#[async_trait::async_trait]
impl MutableRepository<ArgoWorkflow> for RedisRepo {
    async fn insert(&self, entity: &ArgoWorkflow) -> anyhow::Result<i64> {
        let mut connection = self.connection()?;
        let mut workflow = entity.clone();
        if workflow.id == 0 {
            workflow.id = connection.next_id("argo_workflow")?;
        }
        connection.set_json(&workflow_key(workflow.id), &workflow)?;
        connection.query::<()>(&Cmd::set(workflow_task_key(&workflow.task_id), workflow.id))?;
        Ok(workflow.id)
    }

    async fn update(&self, entity: &ArgoWorkflow) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        connection.set_json(&workflow_key(entity.id), entity)?;
        connection.query::<()>(&Cmd::set(workflow_task_key(&entity.task_id), entity.id))?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        if let Some(workflow) = connection.get_json::<ArgoWorkflow>(&workflow_key(id))? {
            connection.delete(&workflow_task_key(&workflow.task_id))?;
        }
        connection.delete(&workflow_key(id))
    }
}

impl DBRepository<ArgoWorkflow> for RedisRepo {}

#[async_trait::async_trait]
impl ArgoWorkflowRepo for RedisRepo {
    async fn find_by_task_id(&self, task_id: &str) -> anyhow::Result<Option<ArgoWorkflow>> {
        self.connection()?.get_indexed(&workflow_task_key(task_id), workflow_key)
    }
}
