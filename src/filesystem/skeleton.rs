use super::template::Template;

/// Illustrative Unix layout. Trailing slash marks a directory.
const SKELETON_PATHS: &[&str] = &[
    "bin/bash",
    "bin/ls",
    "bin/cat",
    "bin/grep",
    "bin/cp",
    "bin/mv",
    "bin/rm",
    "bin/mkdir",
    "bin/touch",
    "bin/echo",
    "bin/pwd",
    "boot/grub",
    "boot/vmlinuz",
    "boot/initrd.img",
    "boot/efi",
    "dev/null",
    "dev/zero",
    "dev/sda",
    "dev/sdb",
    "dev/tty",
    "dev/urandom",
    "dev/loop0",
    "dev/pts",
    "etc/passwd",
    "etc/group",
    "etc/shadow",
    "etc/hostname",
    "etc/hosts",
    "etc/network",
    "etc/profile",
    "etc/fstab",
    "etc/resolv.conf",
    "etc/ssh/",
    "etc/systemd/",
    "etc/init.d/",
    "home/guest/",
    "lib/modules/",
    "lib/systemd/",
    "lib/udev/",
    "lib/firmware/",
    "lib64/ld-linux-x86-64.so.2",
    "lib64/modules/",
    "lost+found/",
    "media/cdrom/",
    "media/usb/",
    "media/floppy/",
    "mnt/data/",
    "mnt/backup/",
    "opt/customApp/",
    "opt/google/",
    "opt/vscode/",
    "proc/cpuinfo",
    "proc/meminfo",
    "proc/uptime",
    "proc/mounts",
    "proc/version",
    "proc/sys/",
    "proc/self/",
    "root/.bashrc",
    "root/.profile",
    "root/.ssh/",
    "root/Downloads/",
    "root/Documents/",
    "run/lock/",
    "run/systemd/",
    "run/user/",
    "run/network/",
    "sbin/init",
    "sbin/ifconfig",
    "sbin/reboot",
    "sbin/shutdown",
    "sbin/iptables",
    "sbin/mount",
    "sbin/fsck",
    "srv/ftp/",
    "srv/www/",
    "srv/git/",
    "sys/block/",
    "sys/bus/",
    "sys/class/",
    "sys/devices/",
    "sys/firmware/",
    "sys/fs/",
    "sys/kernel/",
    "tmp/tempfile1",
    "tmp/tempfile2",
    "tmp/X11-unix/",
    "tmp/systemd-private/",
    "usr/bin/python3",
    "usr/bin/perl",
    "usr/bin/ruby",
    "usr/bin/nano",
    "usr/bin/vim",
    "usr/bin/gcc",
    "usr/bin/make",
    "usr/bin/git",
    "usr/lib/",
    "usr/lib64/",
    "usr/sbin/apache2",
    "usr/sbin/cron",
    "usr/sbin/sshd",
    "usr/share/man/",
    "usr/share/doc/",
    "usr/local/bin/",
    "usr/local/etc/",
    "usr/local/games/",
    "usr/local/include/",
    "usr/local/lib/",
    "usr/local/sbin/",
    "usr/local/share/",
    "usr/local/src/",
    "usr/src/",
    "usr/include/",
    "usr/games/",
    "var/log/syslog",
    "var/log/auth.log",
    "var/log/dmesg",
    "var/log/kern.log",
    "var/log/apt/",
    "var/mail/",
    "var/spool/cron/",
    "var/spool/cups/",
    "var/spool/mail/",
    "var/spool/anacron/",
    "var/tmp/",
    "var/cache/",
    "var/backups/",
    "var/lib/dpkg/",
    "var/lib/apt/",
    "var/lib/systemd/",
    "var/lib/mysql/",
    "var/lib/docker/",
    "var/run/",
];

/// Template for the illustrative root layout.
pub fn skeleton() -> Template {
    Template::from_paths(SKELETON_PATHS)
}
