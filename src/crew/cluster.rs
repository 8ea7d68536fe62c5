//! Built-in cluster information tool.
//!
//! Returns a markdown status report for a demo cluster. This stands in for a
//! live kubectl/API integration so the agent pipeline can be exercised without
//! cluster credentials.

/// Produce a markdown status report for the demo cluster.
pub fn get_cluster_info() -> String {
    let nodes = [
        ("master-node-1", "control-plane", "Ready", "4 cores", "8Gi"),
        ("worker-node-1", "worker", "Ready", "8 cores", "16Gi"),
        ("worker-node-2", "worker", "Ready", "8 cores", "16Gi"),
    ];
    let namespaces = ["default", "kube-system", "production", "staging"];

    let node_lines = nodes
        .iter()
        .map(|(name, role, status, cpu, memory)| {
            format!("- {} ({}): {} - {}, {}", name, role, status, cpu, memory)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# K8s Cluster Status Report\n\n\
        **Cluster**: demo-cluster\n\
        **Version**: v1.28.3\n\n\
        ## Nodes\n{node_lines}\n\n\
        ## Resource Overview\n\
        - **Namespaces**: {ns_count}\n\
        - **Pods**: 45 total (running: 42, pending: 2, failed: 1)\n\
        - **Services**: 12\n\
        - **Deployments**: 8\n\n\
        ## Namespaces\n{ns_list}\n",
        node_lines = node_lines,
        ns_count = namespaces.len(),
        ns_list = namespaces.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mentions_all_nodes() {
        let report = get_cluster_info();
        assert!(report.contains("master-node-1"));
        assert!(report.contains("worker-node-2"));
        assert!(report.contains("demo-cluster"));
    }
}
