use std::sync::Arc;

use domain_deploy::{
    exception::DeployException,
    mock::{
        MockClusterInfoRepo, MockDeployPermissionService, MockDeployTaskRepo, MockDeployer,
        MockResourceGateService, MockRuntimeFrameworkRepo, MockSpaceResourceRepo,
        MockUserResourceRepo,
    },
    model::{
        entity::{ClusterInfo, Deploy, RuntimeFramework, SpaceResource, UserResource},
        vo::{
            DeployActReq, DeployStatus, DeployType, DeployUpdateReq, Instance, ReplicaInfo,
            ServiceStatus,
        },
    },
    service::DeployLifecycleService,
};
use domain_repo::{
    mock::{MockRepoPermissionService, MockRepositoryRepo, MockUserRepo},
    model::{
        entity::{Repository, User},
        vo::RepositoryType,
    },
};
use service_deploy::DeployLifecycleServiceImpl;

fn owner() -> User {
    User {
        id: 1,
        uuid: "u-1".to_owned(),
        username: "alice".to_owned(),
        role_mask: "person".to_owned(),
        ..Default::default()
    }
}

fn deploy() -> Deploy {
    Deploy {
        id: 10,
        repo_id: 3,
        user_id: 1,
        user_uuid: "u-1".to_owned(),
        sku: "5".to_owned(),
        cluster_id: "c1".to_owned(),
        svc_name: "svc-10".to_owned(),
        git_path: "models_alice/llama".to_owned(),
        status: DeployStatus::Stopped,
        deploy_type: DeployType::Inference,
        ..Default::default()
    }
}

fn act_req() -> DeployActReq {
    DeployActReq {
        repo_type: RepositoryType::Model,
        namespace: "alice".to_owned(),
        name: "llama".to_owned(),
        current_user: "alice".to_owned(),
        deploy_id: 10,
        deploy_type: DeployType::Inference,
        instance_name: String::new(),
    }
}

fn running(code: i32) -> ServiceStatus {
    ServiceStatus {
        svc_name: "svc-10".to_owned(),
        code,
        instances: vec![Instance {
            name: "svc-10-0".to_owned(),
            status: "Running".to_owned(),
        }],
    }
}

struct Fixture {
    deployer: MockDeployer,
    deploy_task_repo: MockDeployTaskRepo,
    space_resource_repo: MockSpaceResourceRepo,
    cluster_info_repo: MockClusterInfoRepo,
    user_resource_repo: MockUserResourceRepo,
    runtime_framework_repo: MockRuntimeFrameworkRepo,
    repository_repo: MockRepositoryRepo,
    user_repo: MockUserRepo,
    permission_service: MockDeployPermissionService,
    repo_permission_service: MockRepoPermissionService,
    resource_gate_service: MockResourceGateService,
    public_root_domain: String,
    server_base_url: String,
}

impl Fixture {
    fn new() -> Self {
        Self {
            deployer: MockDeployer::new(),
            deploy_task_repo: MockDeployTaskRepo::new(),
            space_resource_repo: MockSpaceResourceRepo::new(),
            cluster_info_repo: MockClusterInfoRepo::new(),
            user_resource_repo: MockUserResourceRepo::new(),
            runtime_framework_repo: MockRuntimeFrameworkRepo::new(),
            repository_repo: MockRepositoryRepo::new(),
            user_repo: MockUserRepo::new(),
            permission_service: MockDeployPermissionService::new(),
            repo_permission_service: MockRepoPermissionService::new(),
            resource_gate_service: MockResourceGateService::new(),
            public_root_domain: String::new(),
            server_base_url: String::new(),
        }
    }

    /// Permission gate lets the owner through with the given deploy.
    fn allow(mut self, deploy: Deploy) -> Self {
        let for_serverless = deploy.clone();
        self.permission_service
            .expect_check_deploy_permission_for_user()
            .returning(move |_| Ok((owner(), deploy.clone())));
        self.permission_service
            .expect_check_deploy_permission_for_serverless()
            .returning(move |_| Ok((owner(), for_serverless.clone())));
        self
    }

    fn with_resource(mut self) -> Self {
        self.space_resource_repo.expect_get_by_id().returning(|id| {
            Ok(Some(SpaceResource {
                id,
                name: "gpu-a10".to_owned(),
                cluster_id: "c1".to_owned(),
                resources: r#"{"gpu":{"num":"1","type":"A10"},"memory":"16Gi"}"#.to_owned(),
            }))
        });
        self.resource_gate_service
            .expect_check_account_and_resource()
            .returning(|_, _, _, _| Ok(()));
        self
    }

    fn exist(mut self, exist: bool) -> Self {
        self.deployer.expect_exist().returning(move |_| Ok(exist));
        self
    }

    fn build(self) -> DeployLifecycleServiceImpl {
        DeployLifecycleServiceImpl::builder()
            .deployer(Arc::new(self.deployer))
            .deploy_task_repo(Arc::new(self.deploy_task_repo))
            .space_resource_repo(Arc::new(self.space_resource_repo))
            .cluster_info_repo(Arc::new(self.cluster_info_repo))
            .user_resource_repo(Arc::new(self.user_resource_repo))
            .runtime_framework_repo(Arc::new(self.runtime_framework_repo))
            .repository_repo(Arc::new(self.repository_repo))
            .user_repo(Arc::new(self.user_repo))
            .permission_service(Arc::new(self.permission_service))
            .repo_permission_service(Arc::new(self.repo_permission_service))
            .resource_gate_service(Arc::new(self.resource_gate_service))
            .public_root_domain(self.public_root_domain)
            .server_base_url(self.server_base_url)
            .build()
    }
}

#[tokio::test]
async fn start_refuses_running_deploy() {
    for code in [4, 22] {
        let mut fixture = Fixture::new().allow(deploy()).with_resource().exist(true);
        fixture.deployer.expect_status().returning(move |_, _| Ok(running(code)));
        fixture.deployer.expect_stop().never();
        fixture.deployer.expect_start_deploy().never();

        let err = fixture.build().deploy_start(&act_req()).await.unwrap_err();
        assert!(matches!(err, DeployException::InvalidState { .. }));
        assert!(err.to_string().contains("stop deploy first"));
    }
}

#[tokio::test]
async fn start_restarts_stale_service_once() {
    let mut fixture = Fixture::new().allow(deploy()).with_resource().exist(true);
    fixture.deployer.expect_status().returning(|_, _| Ok(running(23)));
    fixture.deployer.expect_stop().times(1).returning(|_| Ok(()));
    fixture.deployer.expect_start_deploy().times(1).returning(|_| Ok(()));

    fixture.build().deploy_start(&act_req()).await.unwrap();
}

#[tokio::test]
async fn start_runtime_error_without_service() {
    let failed = Deploy {
        status: DeployStatus::RunTimeError,
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(failed).with_resource().exist(false);
    fixture.deployer.expect_status().never();
    fixture.deployer.expect_stop().never();
    fixture
        .deployer
        .expect_start_deploy()
        .times(1)
        .withf(|d| d.id == 10)
        .returning(|_| Ok(()));

    fixture.build().deploy_start(&act_req()).await.unwrap();
}

#[tokio::test]
async fn start_rejects_invalid_sku() {
    let broken = Deploy {
        sku: "gpu".to_owned(),
        ..deploy()
    };
    let err = Fixture::new().allow(broken).build().deploy_start(&act_req()).await.unwrap_err();
    assert!(matches!(err, DeployException::BadRequest { .. }));
}

#[tokio::test]
async fn start_wraps_deployer_failure() {
    let mut fixture = Fixture::new().allow(deploy()).with_resource().exist(false);
    fixture
        .deployer
        .expect_start_deploy()
        .returning(|_| Err(anyhow::anyhow!("runner unreachable")));

    let err = fixture.build().deploy_start(&act_req()).await.unwrap_err();
    assert!(matches!(err, DeployException::Failed { .. }));
    assert!(err.to_string().contains("runner unreachable"));
}

#[tokio::test]
async fn stop_fails_while_service_exists() {
    let mut fixture = Fixture::new().allow(deploy()).exist(true);
    fixture.deployer.expect_stop().returning(|_| Err(anyhow::anyhow!("timeout")));
    fixture.deploy_task_repo.expect_stop_deploy().never();

    let err = fixture.build().deploy_stop(&act_req()).await.unwrap_err();
    assert_eq!(err.to_string(), "fail to stop deploy instance");
}

#[tokio::test]
async fn stop_marks_deploy_stopped() {
    let mut fixture = Fixture::new().allow(deploy()).exist(false);
    fixture.deployer.expect_stop().times(1).returning(|_| Ok(()));
    fixture
        .deploy_task_repo
        .expect_stop_deploy()
        .times(1)
        .withf(|repo_type, repo_id, user_id, deploy_id| {
            *repo_type == RepositoryType::Model && *repo_id == 3 && *user_id == 1 && *deploy_id == 10
        })
        .returning(|_, _, _, _| Ok(()));

    fixture.build().deploy_stop(&act_req()).await.unwrap();
}

#[tokio::test]
async fn stop_keeps_gate_status() {
    let mut fixture = Fixture::new();
    fixture
        .permission_service
        .expect_check_deploy_permission_for_user()
        .returning(|_| Err(DeployException::forbidden("deploy was not created by user")));

    let err = fixture.build().deploy_stop(&act_req()).await.unwrap_err();
    assert!(err.to_string().starts_with("fail to check permission for stop deploy"));
    assert_eq!(err.status(), 403);
}

#[tokio::test]
async fn update_refuses_reserved_resource_switch() {
    let reserved = Deploy {
        order_detail_id: 7,
        ..deploy()
    };
    let update = DeployUpdateReq {
        resource_id: Some(6),
        ..Default::default()
    };
    let err = Fixture::new()
        .allow(reserved)
        .build()
        .deploy_update(&act_req(), &update)
        .await
        .unwrap_err();
    assert!(matches!(err, DeployException::BadRequest { .. }));
}

#[tokio::test]
async fn update_restart_field_needs_stop() {
    let mut fixture = Fixture::new().allow(deploy()).exist(true);
    fixture.deployer.expect_update_deploy().never();
    let update = DeployUpdateReq {
        env: Some(r#"{"HF_TOKEN":"x"}"#.to_owned()),
        ..Default::default()
    };

    let err = fixture.build().deploy_update(&act_req(), &update).await.unwrap_err();
    assert!(err.to_string().contains("stop deploy first"));
}

#[tokio::test]
async fn update_rename_while_running() {
    let mut fixture = Fixture::new().allow(deploy()).exist(true);
    fixture
        .deployer
        .expect_update_deploy()
        .times(1)
        .withf(|req, _| req.deploy_name.as_deref() == Some("renamed"))
        .returning(|_, _| Ok(()));
    let update = DeployUpdateReq {
        deploy_name: Some("renamed".to_owned()),
        ..Default::default()
    };

    fixture.build().deploy_update(&act_req(), &update).await.unwrap();
}

#[tokio::test]
async fn update_rejects_invalid_engine_args() {
    let mut fixture = Fixture::new().allow(deploy()).exist(false);
    fixture.deployer.expect_update_deploy().never();
    let update = DeployUpdateReq {
        engine_args: Some("--max-model-len 4096".to_owned()),
        ..Default::default()
    };

    let err = fixture.build().deploy_update(&act_req(), &update).await.unwrap_err();
    assert!(matches!(err, DeployException::BadRequest { .. }));
}

#[tokio::test]
async fn update_resource_rederives_framework() {
    let framework_deploy = Deploy {
        runtime_framework: "vllm".to_owned(),
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(framework_deploy).with_resource().exist(false);
    fixture
        .runtime_framework_repo
        .expect_find_enabled_by_name()
        .withf(|name| name == "vllm")
        .returning(|_| {
            Ok(Some(RuntimeFramework {
                id: 7,
                frame_name: "vllm".to_owned(),
                enabled: true,
                ..Default::default()
            }))
        });
    fixture
        .deployer
        .expect_update_deploy()
        .times(1)
        .withf(|req, _| req.runtime_framework_id == Some(7) && req.resource_id == Some(6))
        .returning(|_, _| Ok(()));
    let update = DeployUpdateReq {
        resource_id: Some(6),
        ..Default::default()
    };

    fixture.build().deploy_update(&act_req(), &update).await.unwrap();
}

#[tokio::test]
async fn update_resource_gates_on_resource_cluster() {
    let framework_deploy = Deploy {
        runtime_framework: "vllm".to_owned(),
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(framework_deploy).exist(false);
    fixture.space_resource_repo.expect_get_by_id().returning(|id| {
        Ok(Some(SpaceResource {
            id,
            name: "gpu-h100".to_owned(),
            cluster_id: "c2".to_owned(),
            resources: r#"{"gpu":{"num":"1","type":"H100"},"memory":"80Gi"}"#.to_owned(),
        }))
    });
    fixture
        .resource_gate_service
        .expect_check_account_and_resource()
        .times(1)
        .withf(|_, cluster_id, _, resource| cluster_id == "c2" && resource.id == 6)
        .returning(|_, _, _, _| Ok(()));
    fixture.runtime_framework_repo.expect_find_enabled_by_name().returning(|_| {
        Ok(Some(RuntimeFramework {
            id: 7,
            frame_name: "vllm".to_owned(),
            enabled: true,
            ..Default::default()
        }))
    });
    fixture.deployer.expect_update_deploy().times(1).returning(|_, _| Ok(()));
    let update = DeployUpdateReq {
        resource_id: Some(6),
        ..Default::default()
    };

    fixture.build().deploy_update(&act_req(), &update).await.unwrap();
}

#[tokio::test]
async fn update_rejects_unknown_cluster() {
    let mut fixture = Fixture::new().allow(deploy());
    fixture.cluster_info_repo.expect_get_by_cluster_id().returning(|_| Ok(None));
    let update = DeployUpdateReq {
        cluster_id: Some("nowhere".to_owned()),
        ..Default::default()
    };

    let err = fixture.build().deploy_update(&act_req(), &update).await.unwrap_err();
    assert!(matches!(err, DeployException::BadRequest { .. }));
}

#[tokio::test]
async fn delete_keeps_row_while_service_exists() {
    let mut fixture = Fixture::new().allow(deploy()).exist(true);
    fixture.deployer.expect_purge().returning(|_| Err(anyhow::anyhow!("purge failed")));
    fixture.deploy_task_repo.expect_delete_deploy().never();
    fixture.deploy_task_repo.expect_delete_deploy_now().never();

    let err = fixture.build().delete_deploy(&act_req()).await.unwrap_err();
    assert_eq!(err.to_string(), "fail to delete service");
}

#[tokio::test]
async fn delete_keeps_row_when_exist_check_fails() {
    let mut fixture = Fixture::new().allow(deploy());
    fixture.deployer.expect_purge().returning(|_| Err(anyhow::anyhow!("runner down")));
    fixture.deployer.expect_exist().returning(|_| Err(anyhow::anyhow!("runner down")));
    fixture.deploy_task_repo.expect_delete_deploy().never();
    fixture.deploy_task_repo.expect_delete_deploy_now().never();
    fixture.user_resource_repo.expect_update().never();

    let err = fixture.build().delete_deploy(&act_req()).await.unwrap_err();
    assert!(err.to_string().starts_with("check deploy exists"));
}

#[tokio::test]
async fn delete_releases_reserved_resource() {
    let reserved = Deploy {
        order_detail_id: 9,
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(reserved).exist(false);
    fixture.deployer.expect_purge().returning(|_| Ok(()));
    fixture
        .deploy_task_repo
        .expect_delete_deploy()
        .times(1)
        .returning(|_, _, _, _| Ok(()));
    fixture
        .user_resource_repo
        .expect_find_by_order_detail_id()
        .withf(|uid, order| uid == "u-1" && *order == 9)
        .returning(|_, _| {
            Ok(Some(UserResource {
                id: 1,
                user_uid: "u-1".to_owned(),
                order_detail_id: 9,
                deploy_id: 10,
                resource_id: 5,
            }))
        });
    fixture
        .user_resource_repo
        .expect_update()
        .times(1)
        .withf(|resource| resource.deploy_id == 0)
        .returning(|_| Ok(()));

    fixture.build().delete_deploy(&act_req()).await.unwrap();
}

#[tokio::test]
async fn delete_serverless_removes_repo_deploy_now() {
    let serverless = Deploy {
        id: 11,
        deploy_type: DeployType::Serverless,
        ..deploy()
    };
    let mut fixture = Fixture::new().exist(false);
    fixture.repository_repo.expect_find_by_path().returning(|_, _, _| {
        Ok(Some(Repository {
            id: 3,
            ..Default::default()
        }))
    });
    let found = serverless.clone();
    fixture
        .deploy_task_repo
        .expect_get_serverless_deploy_by_repo_id()
        .withf(|repo_id| *repo_id == 3)
        .returning(move |_| Ok(Some(found.clone())));
    fixture
        .permission_service
        .expect_check_deploy_permission_for_user()
        .withf(|req| req.deploy_id == 11)
        .returning(move |_| Ok((owner(), serverless.clone())));
    fixture.deployer.expect_purge().returning(|_| Ok(()));
    fixture
        .deploy_task_repo
        .expect_delete_deploy_now()
        .times(1)
        .withf(|id| *id == 11)
        .returning(|_| Ok(()));
    fixture.deploy_task_repo.expect_delete_deploy().never();

    let req = DeployActReq {
        deploy_type: DeployType::Serverless,
        deploy_id: 0,
        ..act_req()
    };
    fixture.build().delete_deploy(&req).await.unwrap();
}

#[tokio::test]
async fn detail_overlays_live_status() {
    let finetune = Deploy {
        deploy_type: DeployType::Finetune,
        variables: r#"{"GGUF_ENTRY_POINT":"model-q4.gguf"}"#.to_owned(),
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(finetune);
    fixture.public_root_domain = "example.com".to_owned();
    fixture.deployer.expect_get_replica().returning(|_| Err(anyhow::anyhow!("no replica")));
    fixture.deployer.expect_status().returning(|_, _| Ok(running(22)));
    fixture.cluster_info_repo.expect_get_by_cluster_id().returning(|id| {
        Ok(Some(ClusterInfo {
            cluster_id: id.to_owned(),
            zone: "z1".to_owned(),
            provider: "aliyun".to_owned(),
            ..Default::default()
        }))
    });

    let req = DeployActReq {
        deploy_type: DeployType::Finetune,
        ..act_req()
    };
    let detail = fixture.build().deploy_detail(&req).await.unwrap();
    assert_eq!(detail.status, "Running");
    assert_eq!(detail.endpoint, "svc-10.z1.aliyun.example.com");
    assert_eq!(detail.proxy_endpoint, "svc-10.z1.aliyun.example.com/proxy/7860/");
    assert_eq!(detail.provider, "aliyun");
    assert_eq!(detail.entrypoint, "model-q4.gguf");
    assert_eq!(detail.path, "alice/llama");
    assert_eq!(detail.actual_replica, 0);
    assert_eq!(detail.instances.len(), 1);
}

#[tokio::test]
async fn detail_rejects_broken_variables() {
    let broken = Deploy {
        variables: "{".to_owned(),
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(broken);
    fixture.deployer.expect_get_replica().returning(|_| Ok(ReplicaInfo::default()));
    fixture.deployer.expect_status().returning(|_, _| Err(anyhow::anyhow!("down")));

    let err = fixture.build().deploy_detail(&act_req()).await.unwrap_err();
    assert!(err.to_string().starts_with("failed to convert variables to map"));
}

#[tokio::test]
async fn endpoint_without_public_domain() {
    let mut fixture = Fixture::new();
    fixture.server_base_url = "https://hub.example.com/".to_owned();
    fixture.cluster_info_repo.expect_get_by_cluster_id().returning(|_| Ok(None));
    let service = fixture.build();

    let live = Deploy {
        status: DeployStatus::Running,
        ..deploy()
    };
    let (endpoint, _) = service.generate_endpoint(&live).await;
    assert_eq!(endpoint, "hub.example.com/endpoint/svc-10");

    let (endpoint, _) = service.generate_endpoint(&deploy()).await;
    assert!(endpoint.is_empty());
}

#[tokio::test]
async fn status_report_degrades_to_stopped() {
    let mut fixture = Fixture::new();
    fixture.deploy_task_repo.expect_get_by_id().returning(|_| Ok(Some(deploy())));
    fixture.deployer.expect_status().returning(|_, _| Err(anyhow::anyhow!("runner down")));

    let report = fixture.build().deploy_status(RepositoryType::Model, "alice", "llama", 10).await;
    assert_eq!(report.status, "Stopped");
    assert!(report.error.unwrap().contains("runner down"));
}

#[tokio::test]
async fn status_report_maps_code() {
    let mut fixture = Fixture::new();
    fixture.deploy_task_repo.expect_get_by_id().returning(|_| {
        Ok(Some(Deploy {
            message: "OOMKilled".to_owned(),
            ..deploy()
        }))
    });
    fixture.deployer.expect_status().returning(|_, _| Ok(running(23)));

    let report = fixture.build().deploy_status(RepositoryType::Model, "alice", "llama", 10).await;
    assert_eq!(report.status, "RuntimeError");
    assert_eq!(report.message, "OOMKilled");
    assert_eq!(report.details.len(), 1);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn status_report_missing_deploy() {
    let mut fixture = Fixture::new();
    fixture.deploy_task_repo.expect_get_by_id().returning(|_| Ok(None));

    let report = fixture.build().deploy_status(RepositoryType::Model, "alice", "llama", 10).await;
    assert_eq!(report.status, "Stopped");
    assert!(report.error.is_some());
}

#[tokio::test]
async fn list_deploy_requires_user() {
    let mut fixture = Fixture::new();
    fixture.user_repo.expect_find_by_username().returning(|_| Ok(None));

    let err = fixture
        .build()
        .list_deploy(RepositoryType::Model, "alice", "llama", "ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, DeployException::NotFound { .. }));
}

#[tokio::test]
async fn list_deploy_renders_status() {
    let mut fixture = Fixture::new();
    fixture.user_repo.expect_find_by_username().returning(|_| Ok(Some(owner())));
    fixture.repository_repo.expect_find_by_path().returning(|_, _, _| {
        Ok(Some(Repository {
            id: 3,
            ..Default::default()
        }))
    });
    fixture
        .deploy_task_repo
        .expect_list_deploy()
        .withf(|_, repo_id, user_id| *repo_id == 3 && *user_id == 1)
        .returning(|_, _, _| {
            Ok(vec![Deploy {
                status: DeployStatus::BuildFailed,
                ..deploy()
            }])
        });

    let deploys = fixture
        .build()
        .list_deploy(RepositoryType::Model, "alice", "llama", "alice")
        .await
        .unwrap();
    assert_eq!(deploys.len(), 1);
    assert_eq!(deploys[0].status, "BuildingFailed");
}

#[tokio::test]
async fn serverless_access_needs_admin() {
    let mut fixture = Fixture::new();
    fixture.repository_repo.expect_find_by_path().returning(|_, _, _| {
        Ok(Some(Repository {
            id: 3,
            ..Default::default()
        }))
    });
    fixture.user_repo.expect_find_by_username().returning(|_| Ok(Some(owner())));

    let req = DeployActReq {
        deploy_type: DeployType::Serverless,
        ..act_req()
    };
    let err = fixture.build().allow_access_deploy(&req).await.unwrap_err();
    assert_eq!(err.status(), 403);
}

#[tokio::test]
async fn access_rejects_deploy_of_other_repo() {
    let other_repo = Deploy {
        repo_id: 99,
        ..deploy()
    };
    let mut fixture = Fixture::new().allow(other_repo);
    fixture.repository_repo.expect_find_by_path().returning(|_, _, _| {
        Ok(Some(Repository {
            id: 3,
            ..Default::default()
        }))
    });

    let err = fixture.build().allow_access_deploy(&act_req()).await.unwrap_err();
    assert!(matches!(err, DeployException::BadRequest { .. }));
}

#[tokio::test]
async fn read_access_by_deploy_id() {
    let mut fixture = Fixture::new();
    fixture.user_repo.expect_find_by_username().returning(|_| Ok(Some(owner())));
    fixture.repository_repo.expect_find_by_path().returning(|_, _, _| {
        Ok(Some(Repository {
            id: 3,
            private: true,
            ..Default::default()
        }))
    });
    fixture.deploy_task_repo.expect_get_by_id().returning(|_| Ok(Some(deploy())));
    fixture
        .repo_permission_service
        .expect_allow_read_access_repo()
        .returning(|_, _| Ok(true));

    let allowed = fixture
        .build()
        .allow_read_access_by_deploy_id(RepositoryType::Model, "alice", "llama", "alice", 10)
        .await
        .unwrap();
    assert!(allowed);
}

#[tokio::test]
async fn deploy_by_svc_name_not_found() {
    let mut fixture = Fixture::new();
    fixture.deploy_task_repo.expect_get_deploy_by_svc_name().returning(|_| Ok(None));

    let err = fixture.build().get_deploy_by_svc_name("svc-x").await.unwrap_err();
    assert_eq!(err.to_string(), "not found: do not found deploy by svc name:svc-x");
}

#[tokio::test]
async fn instance_logs_target_instance() {
    let mut fixture = Fixture::new().allow(deploy());
    fixture
        .deployer
        .expect_instance_logs()
        .withf(|dr| dr.instance_name == "svc-10-0" && dr.svc_name == "svc-10")
        .returning(|_| {
            let (tx, rx) = flume::unbounded();
            tx.send("ready".to_owned()).unwrap();
            Ok(rx)
        });

    let req = DeployActReq {
        instance_name: "svc-10-0".to_owned(),
        ..act_req()
    };
    let logs = fixture.build().deploy_instance_logs(&req).await.unwrap();
    assert_eq!(logs.recv_async().await.unwrap(), "ready");
}
