use anyhow::Context;
use chrono::Utc;
use domain_deploy::{
    model::{
        entity::{
            ClusterInfo, Deploy, DeployTask, DeployTaskType, RuntimeFramework, SpaceResource,
            UserResource,
        },
        vo::{DeployStatus, DeployType},
    },
    repository::{
        ClusterInfoRepo, DeployTaskRepo, RuntimeFrameworkRepo, SpaceResourceRepo,
        UserResourceRepo,
    },
};
use domain_repo::model::vo::RepositoryType;
use hub_architecture::repository::{DBRepository, MutableRepository, ReadOnlyRepository};
use redis::Cmd;

use crate::infrastructure::database::{RedisConnection, RedisRepo};

fn deploy_key(id: i64) -> String {
    format!("deploy:{id}")
}

fn deploy_svc_key(svc_name: &str) -> String {
    format!("deploy:svc:{svc_name}")
}

fn serverless_deploy_key(repo_id: i64) -> String {
    format!("deploy:serverless:{repo_id}")
}

/// Sorted set of the deploy ids a user has on a repository, scored by id.
fn user_deploys_key(repo_id: i64, user_id: i64) -> String {
    format!("deploy:repo:{repo_id}:user:{user_id}")
}

fn deploy_tasks_key(deploy_id: i64) -> String {
    format!("deploy:{deploy_id}:tasks")
}

fn last_task_key(deploy_id: i64, task_type: DeployTaskType) -> String {
    format!("deploy:{deploy_id}:last_task:{}", task_type as i32)
}

fn deploy_task_key(id: i64) -> String {
    format!("deploy_task:{id}")
}

fn space_resource_key(id: i64) -> String {
    format!("space_resource:{id}")
}

fn cluster_key(cluster_id: &str) -> String {
    format!("cluster:{cluster_id}")
}

const CLUSTERS_KEY: &str = "clusters";

fn runtime_framework_key(id: i64) -> String {
    format!("runtime_framework:{id}")
}

fn runtime_framework_name_key(name: &str) -> String {
    format!("runtime_framework:name:{name}")
}

fn user_resource_key(user_uid: &str, order_detail_id: i64) -> String {
    format!("user_resource:{user_uid}:{order_detail_id}")
}

/// Deploys of a user on a repository as listed to them, ids newest first.
fn visible_deploys(repo_type: RepositoryType, deploys: Vec<Deploy>) -> Vec<Deploy> {
    let deploys = deploys.into_iter().filter(|d| {
        repo_type != RepositoryType::Model || d.status != DeployStatus::Deleted
    });
    match repo_type {
        RepositoryType::Space => deploys.take(1).collect(),
        _ => deploys.collect(),
    }
}

impl RedisRepo {
    fn write_deploy_indexes(connection: &mut RedisConnection, deploy: &Deploy) -> anyhow::Result<()> {
        if !deploy.svc_name.is_empty() {
            connection.query::<()>(&Cmd::set(deploy_svc_key(&deploy.svc_name), deploy.id))?;
        }
        if deploy.deploy_type == DeployType::Serverless {
            connection.query::<()>(&Cmd::set(serverless_deploy_key(deploy.repo_id), deploy.id))?;
        }
        connection.query::<()>(&Cmd::zadd(
            user_deploys_key(deploy.repo_id, deploy.user_id),
            deploy.id,
            deploy.id,
        ))?;
        Ok(())
    }

    fn remove_deploy_indexes(connection: &mut RedisConnection, deploy: &Deploy) -> anyhow::Result<()> {
        if !deploy.svc_name.is_empty() {
            connection.delete(&deploy_svc_key(&deploy.svc_name))?;
        }
        if deploy.deploy_type == DeployType::Serverless {
            connection.delete(&serverless_deploy_key(deploy.repo_id))?;
        }
        connection.query::<()>(&Cmd::zrem(
            user_deploys_key(deploy.repo_id, deploy.user_id),
            deploy.id,
        ))?;
        Ok(())
    }

    /// Load a deploy only if it belongs to the repository and user.
    fn owned_deploy(
        connection: &mut RedisConnection,
        repo_id: i64,
        user_id: i64,
        deploy_id: i64,
    ) -> anyhow::Result<Deploy> {
        connection
            .get_json::<Deploy>(&deploy_key(deploy_id))?
            .filter(|d| d.repo_id == repo_id && d.user_id == user_id)
            .with_context(|| {
                format!("deploy {deploy_id} of repo {repo_id} and user {user_id} not found")
            })
    }

    fn set_owned_deploy_status(
        &self,
        repo_id: i64,
        user_id: i64,
        deploy_id: i64,
        status: DeployStatus,
    ) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        let mut deploy = Self::owned_deploy(&mut connection, repo_id, user_id, deploy_id)?;
        deploy.status = status;
        deploy.updated_at = Utc::now();
        connection.set_json(&deploy_key(deploy.id), &deploy)
    }
}

#[async_trait::async_trait]
impl ReadOnlyRepository<Deploy> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Deploy>> {
        self.connection()?.get_json(&deploy_key(id))
    }
}

#[async_trait::async_trait]
impl MutableRepository<Deploy> for RedisRepo {
    async fn insert(&self, entity: &Deploy) -> anyhow::Result<i64> {
        let mut connection = self.connection()?;
        let mut deploy = entity.clone();
        if deploy.id == 0 {
            deploy.id = connection.next_id("deploy")?;
        }
        let now = Utc::now();
        deploy.created_at = now;
        deploy.updated_at = now;
        connection.set_json(&deploy_key(deploy.id), &deploy)?;
        Self::write_deploy_indexes(&mut connection, &deploy)?;
        Ok(deploy.id)
    }

    async fn update(&self, entity: &Deploy) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        let previous: Deploy = connection
            .get_json(&deploy_key(entity.id))?
            .with_context(|| format!("deploy {} not found", entity.id))?;
        if previous.svc_name != entity.svc_name {
            Self::remove_deploy_indexes(&mut connection, &previous)?;
        }
        let mut deploy = entity.clone();
        deploy.updated_at = Utc::now();
        connection.set_json(&deploy_key(deploy.id), &deploy)?;
        Self::write_deploy_indexes(&mut connection, &deploy)
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        if let Some(deploy) = connection.get_json::<Deploy>(&deploy_key(id))? {
            Self::remove_deploy_indexes(&mut connection, &deploy)?;
        }
        connection.delete(&deploy_key(id))
    }
}

impl DBRepository<Deploy> for RedisRepo {}

#[async_trait::async_trait]
impl DeployTaskRepo for RedisRepo {
    async fn get_deploy_by_svc_name(&self, svc_name: &str) -> anyhow::Result<Option<Deploy>> {
        self.connection()?.get_indexed(&deploy_svc_key(svc_name), deploy_key)
    }

    async fn get_serverless_deploy_by_repo_id(
        &self,
        repo_id: i64,
    ) -> anyhow::Result<Option<Deploy>> {
        self.connection()?.get_indexed(&serverless_deploy_key(repo_id), deploy_key)
    }

    async fn list_deploy(
        &self,
        repo_type: RepositoryType,
        repo_id: i64,
        user_id: i64,
    ) -> anyhow::Result<Vec<Deploy>> {
        let mut connection = self.connection()?;
        let ids: Vec<i64> =
            connection.query(&Cmd::zrevrange(user_deploys_key(repo_id, user_id), 0, -1))?;
        let mut deploys = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(deploy) = connection.get_json(&deploy_key(id))? {
                deploys.push(deploy);
            }
        }
        Ok(visible_deploys(repo_type, deploys))
    }

    async fn stop_deploy(
        &self,
        _repo_type: RepositoryType,
        repo_id: i64,
        user_id: i64,
        deploy_id: i64,
    ) -> anyhow::Result<()> {
        self.set_owned_deploy_status(repo_id, user_id, deploy_id, DeployStatus::Stopped)
    }

    async fn delete_deploy(
        &self,
        _repo_type: RepositoryType,
        repo_id: i64,
        user_id: i64,
        deploy_id: i64,
    ) -> anyhow::Result<()> {
        self.set_owned_deploy_status(repo_id, user_id, deploy_id, DeployStatus::Deleted)
    }

    async fn delete_deploy_now(&self, deploy_id: i64) -> anyhow::Result<()> {
        {
            let mut connection = self.connection()?;
            let task_ids: Vec<i64> =
                connection.query(&Cmd::smembers(deploy_tasks_key(deploy_id)))?;
            for task_id in task_ids {
                connection.delete(&deploy_task_key(task_id))?;
            }
            connection.delete(&deploy_tasks_key(deploy_id))?;
            for task_type in [DeployTaskType::Build, DeployTaskType::Run] {
                connection.delete(&last_task_key(deploy_id, task_type))?;
            }
        }
        MutableRepository::<Deploy>::delete_by_id(self, deploy_id).await
    }

    async fn get_deploy_task(&self, task_id: i64) -> anyhow::Result<Option<DeployTask>> {
        self.connection()?.get_json(&deploy_task_key(task_id))
    }

    async fn get_last_task_by_type(
        &self,
        deploy_id: i64,
        task_type: DeployTaskType,
    ) -> anyhow::Result<Option<DeployTask>> {
        self.connection()?.get_indexed(&last_task_key(deploy_id, task_type), deploy_task_key)
    }

    async fn create_deploy_task(&self, task: &DeployTask) -> anyhow::Result<i64> {
        let mut connection = self.connection()?;
        let mut task = task.clone();
        task.id = connection.next_id("deploy_task")?;
        connection.set_json(&deploy_task_key(task.id), &task)?;
        connection.query::<()>(&Cmd::sadd(deploy_tasks_key(task.deploy_id), task.id))?;
        connection.query::<()>(&Cmd::set(last_task_key(task.deploy_id, task.task_type), task.id))?;
        Ok(task.id)
    }

    async fn update_deploy_task(&self, task: &DeployTask) -> anyhow::Result<()> {
        self.connection()?.set_json(&deploy_task_key(task.id), task)
    }
}

#[async_trait::async_trait]
impl ReadOnlyRepository<SpaceResource> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<SpaceResource>> {
        self.connection()?.get_json(&space_resource_key(id))
    }
}

impl SpaceResourceRepo for RedisRepo {}

#[async_trait::async_trait]
impl ClusterInfoRepo for RedisRepo {
    async fn get_by_cluster_id(&self, cluster_id: &str) -> anyhow::Result<Option<ClusterInfo>> {
        self.connection()?.get_json(&cluster_key(cluster_id))
    }

    async fn upsert(&self, cluster: &ClusterInfo) -> anyhow::Result<()> {
        let mut connection = self.connection()?;
        connection.set_json(&cluster_key(&cluster.cluster_id), cluster)?;
        connection.query::<()>(&Cmd::sadd(CLUSTERS_KEY, &cluster.cluster_id))?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<ClusterInfo>> {
        let mut connection = self.connection()?;
        let mut cluster_ids: Vec<String> = connection.query(&Cmd::smembers(CLUSTERS_KEY))?;
        cluster_ids.sort();
        let mut clusters = Vec::with_capacity(cluster_ids.len());
        for cluster_id in cluster_ids {
            if let Some(cluster) = connection.get_json(&cluster_key(&cluster_id))? {
                clusters.push(cluster);
            }
        }
        Ok(clusters)
    }
}

#[async_trait::async_trait]
impl ReadOnlyRepository<RuntimeFramework> for RedisRepo {
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<RuntimeFramework>> {
        self.connection()?.get_json(&runtime_framework_key(id))
    }
}

#[async_trait::async_trait]
impl RuntimeFrameworkRepo for RedisRepo {
    async fn find_enabled_by_name(&self, name: &str) -> anyhow::Result<Option<RuntimeFramework>> {
        let frame: Option<RuntimeFramework> = self
            .connection()?
            .get_indexed(&runtime_framework_name_key(name), runtime_framework_key)?;
        Ok(frame.filter(|f| f.enabled))
    }
}

#[async_trait::async_trait]
impl UserResourceRepo for RedisRepo {
    async fn find_by_order_detail_id(
        &self,
        user_uid: &str,
        order_detail_id: i64,
    ) -> anyhow::Result<Option<UserResource>> {
        self.connection()?.get_json(&user_resource_key(user_uid, order_detail_id))
    }

    async fn update(&self, resource: &UserResource) -> anyhow::Result<()> {
        self.connection()?
            .set_json(&user_resource_key(&resource.user_uid, resource.order_detail_id), resource)
    }
}
