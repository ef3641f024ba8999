// 对比 FAST_SEEK 开关前后的 seek 耗时, 开关见 `--features fast-seek`
use seekbench::config::HOST_MOUNT_ROOT;
use seekbench::{setup, BenchConfig, HostBoard, MonotonicClock};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut board = HostBoard::new(HOST_MOUNT_ROOT);
    match setup(&mut board, MonotonicClock::new(), BenchConfig::default()) {
        Ok(mut session) => session.run(),
        // 错误已经记录过了, 和设备一样停在这里直到复位
        Err(_) => loop {
            std::thread::park();
        },
    }
}
