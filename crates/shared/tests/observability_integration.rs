//! 可观测性模块集成测试

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use cascade_shared::observability::metrics::{
        record_fetch, record_http_request, record_selection, record_stale_response,
    };

    #[test]
    fn test_record_fetch_outcomes() {
        // 未安装 recorder 时记录为空操作，不应 panic
        record_fetch("/api/schools", "success", 0.02);
        record_fetch("/api/grades", "HTTP_ERROR", 0.15);
        record_fetch("/api/classes", "NETWORK_ERROR", 3.0);
        record_fetch("/api/equipment", "PARSE_ERROR", 0.01);
    }

    #[test]
    fn test_record_pipeline_counters() {
        record_selection("school");
        record_selection("class");
        record_stale_response("grade");
        record_stale_response("equipment");
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("/api/schools", 200);
        record_http_request("/api/classes", 400);
        record_http_request("/api/classes", 500);
    }
}

// ============================================================================
// 日志过滤测试
// ============================================================================

mod tracing_tests {
    use cascade_shared::observability::ObservabilityConfig;
    use cascade_shared::observability::tracing::build_filter;

    #[test]
    fn test_filter_from_config_level() {
        let config = ObservabilityConfig::default().with_log_level("debug");
        let filter = build_filter(&config);
        // RUST_LOG 存在时以其为准，这里只验证能够构建
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = ObservabilityConfig::default().with_log_level("not a level ===");
        let filter = build_filter(&config);
        assert!(!filter.to_string().is_empty());
    }
}

// ============================================================================
// 配置与守卫测试
// ============================================================================

mod config_tests {
    use cascade_shared::observability::{ObservabilityConfig, ObservabilityGuard};

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(!config.metrics_enabled);
        assert_eq!(config.metrics_port, 9090);
    }

    #[test]
    fn test_empty_guard() {
        let guard = ObservabilityGuard::empty();
        drop(guard);
    }
}
